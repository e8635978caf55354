use crate::config::Config;
use crate::error::{PortfolioError, Result};
use crate::processors::url::RepoRef;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Repository metadata from `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryMetadata {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub default_branch: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
}

/// The dependency tables of a `package.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl PackageManifest {
    /// Dependency names, runtime dependencies first, each table in key order
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .map(String::as_str)
    }
}

/// Everything fetched about one repository
#[derive(Debug, Clone, Default)]
pub struct RepositorySnapshot {
    pub metadata: RepositoryMetadata,
    pub readme: Option<String>,
    pub package_manifest: Option<PackageManifest>,
    pub requirements: Option<String>,
    /// Bytes of code per language
    pub languages: BTreeMap<String, u64>,
}

/// Body of the readme and contents endpoints
#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: Option<String>,
    encoding: Option<String>,
}

/// Read-only GitHub REST API client
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
}

impl GitHubClient {
    /// Creates a client from the configured API base, user agent, timeout and token
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.github.api_base).map_err(|e| {
            PortfolioError::Config(format!("Invalid GitHub API base '{}': {}", config.github.api_base, e))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(PortfolioError::Config(format!(
                "GitHub API base must be http(s), got '{}'",
                base.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.github.user_agent)
                .map_err(|e| PortfolioError::Config(format!("Invalid user agent: {}", e)))?,
        );
        if let Some(token) = config.github_token() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| PortfolioError::Config(format!("Invalid GitHub token: {}", e)))?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: config.github.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the primary repository metadata
    ///
    /// This is the only fatal lookup: a 404 becomes
    /// [`PortfolioError::RepositoryNotFound`].
    pub async fn fetch_repository(&self, repo: &RepoRef) -> Result<RepositoryMetadata> {
        let url = format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.repo);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(PortfolioError::RepositoryNotFound(repo.to_string()));
        }
        if is_rate_limited(status, response.headers()) {
            return Err(PortfolioError::RateLimitExceeded(
                "GitHub API rate limit exceeded; set GITHUB_TOKEN for a higher limit".into(),
            ));
        }
        if !status.is_success() {
            return Err(PortfolioError::GitHubApi(format!(
                "Failed to fetch repository {}: HTTP {}",
                repo, status
            )));
        }

        let metadata = response.json::<RepositoryMetadata>().await?;
        info!(
            "Fetched {} ({} stars, {} topics)",
            metadata.full_name,
            metadata.stargazers_count,
            metadata.topics.len()
        );
        Ok(metadata)
    }

    /// Fetches and decodes the repository README
    pub async fn fetch_readme(&self, repo: &RepoRef) -> Option<String> {
        let url = format!("{}/repos/{}/{}/readme", self.api_base, repo.owner, repo.repo);
        let body: ContentResponse = self.get_optional(&url).await?;
        decode_content(body, "README")
    }

    /// Fetches a file from the repository root through the contents API
    pub async fn fetch_file(&self, repo: &RepoRef, path: &str) -> Option<String> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, repo.owner, repo.repo, path
        );
        let body: ContentResponse = self.get_optional(&url).await?;
        decode_content(body, path)
    }

    /// Fetches and parses `package.json`
    pub async fn fetch_package_manifest(&self, repo: &RepoRef) -> Option<PackageManifest> {
        let text = self.fetch_file(repo, "package.json").await?;
        match serde_json::from_str(&text) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!("Ignoring unparseable package.json in {}: {}", repo, e);
                None
            }
        }
    }

    /// Fetches `requirements.txt`
    pub async fn fetch_requirements(&self, repo: &RepoRef) -> Option<String> {
        self.fetch_file(repo, "requirements.txt").await
    }

    /// Fetches the per-language byte counts
    pub async fn fetch_languages(&self, repo: &RepoRef) -> Option<BTreeMap<String, u64>> {
        let url = format!("{}/repos/{}/{}/languages", self.api_base, repo.owner, repo.repo);
        self.get_optional(&url).await
    }

    /// Runs every lookup for `repo`, one after another
    ///
    /// Only a failure of the metadata lookup is returned as an error; missing
    /// optional resources are left as `None` or empty.
    pub async fn fetch_snapshot(&self, repo: &RepoRef) -> Result<RepositorySnapshot> {
        let metadata = self.fetch_repository(repo).await?;
        let readme = self.fetch_readme(repo).await;
        let package_manifest = self.fetch_package_manifest(repo).await;
        let requirements = self.fetch_requirements(repo).await;
        let languages = self.fetch_languages(repo).await.unwrap_or_default();

        Ok(RepositorySnapshot {
            metadata,
            readme,
            package_manifest,
            requirements,
            languages,
        })
    }

    /// GETs and deserializes `url`; any failure is logged and reported as absent
    async fn get_optional<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        debug!("GET {}", url);
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{} not found, treating as absent", url);
            return None;
        }
        if !status.is_success() {
            warn!("Optional lookup {} returned HTTP {}", url, status);
            return None;
        }

        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Unexpected response body from {}: {}", url, e);
                None
            }
        }
    }
}

fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    status == StatusCode::FORBIDDEN
        && headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map_or(false, |remaining| remaining.trim() == "0")
}

fn decode_content(body: ContentResponse, what: &str) -> Option<String> {
    let content = body.content?;
    match body.encoding.as_deref() {
        Some("base64") | None => match decode_base64(&content) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Could not decode {}: {}", what, e);
                None
            }
        },
        Some("utf-8") | Some("utf8") => Some(content),
        Some(other) => {
            warn!("Unsupported {} encoding '{}'", what, other);
            None
        }
    }
}

/// Decodes the line-wrapped base64 the contents API returns
pub fn decode_base64(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| PortfolioError::GitHubApi(format!("Invalid base64 content: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::path::PathBuf;

    fn client_for(server: &mockito::ServerGuard) -> GitHubClient {
        let mut config = Config::new(PathBuf::from("."));
        config.github.api_base = server.url();
        GitHubClient::new(&config).unwrap()
    }

    #[test]
    fn test_rejects_bad_api_base() {
        let mut config = Config::new(PathBuf::from("."));
        config.github.api_base = "not a url".into();
        assert!(matches!(GitHubClient::new(&config), Err(PortfolioError::Config(_))));

        config.github.api_base = "ftp://api.github.com".into();
        assert!(matches!(GitHubClient::new(&config), Err(PortfolioError::Config(_))));
    }

    #[test]
    fn test_decode_wrapped_base64() {
        let encoded = "IyBIZWxs\nbyB3b3Js\nZAo=\n";
        assert_eq!(decode_base64(encoded).unwrap(), "# Hello world\n");
        assert!(decode_base64("!!!").is_err());
    }

    #[tokio::test]
    async fn test_fetch_repository() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/app")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"name": "app", "full_name": "octo/app", "description": "Test repo",
                    "html_url": "https://github.com/octo/app", "topics": ["react", "docker"],
                    "stargazers_count": 12, "forks_count": 3, "license": null}"#,
            )
            .create_async()
            .await;

        let metadata = client_for(&server)
            .fetch_repository(&RepoRef::new("octo", "app"))
            .await
            .unwrap();

        assert_eq!(metadata.full_name, "octo/app");
        assert_eq!(metadata.topics, vec!["react", "docker"]);
        assert_eq!(metadata.stargazers_count, 12);
        assert_eq!(metadata.homepage, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_repository_is_fatal() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/octo/missing")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let result = client_for(&server)
            .fetch_repository(&RepoRef::new("octo", "missing"))
            .await;
        assert!(matches!(result, Err(PortfolioError::RepositoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/octo/app")
            .with_status(403)
            .with_header("x-ratelimit-remaining", "0")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let result = client_for(&server)
            .fetch_repository(&RepoRef::new("octo", "app"))
            .await;
        assert!(matches!(result, Err(PortfolioError::RateLimitExceeded(_))));
    }

    #[tokio::test]
    async fn test_optional_lookups() {
        let mut server = Server::new_async().await;
        let _readme = server
            .mock("GET", "/repos/octo/app/readme")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": "IyBIZWxs\nbyB3b3Js\nZAo=\n", "encoding": "base64"}"#)
            .create_async()
            .await;
        let _package = server
            .mock("GET", "/repos/octo/app/contents/package.json")
            .with_status(404)
            .create_async()
            .await;
        let _languages = server
            .mock("GET", "/repos/octo/app/languages")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server);
        let repo = RepoRef::new("octo", "app");

        assert_eq!(client.fetch_readme(&repo).await.as_deref(), Some("# Hello world\n"));
        assert!(client.fetch_package_manifest(&repo).await.is_none());
        assert!(client.fetch_languages(&repo).await.is_none());
    }

    #[test]
    fn test_package_manifest_dependency_order() {
        let manifest: PackageManifest = serde_json::from_str(
            r#"{"dependencies": {"react": "^18", "axios": "^1"}, "devDependencies": {"vite": "^5"}}"#,
        )
        .unwrap();
        let names: Vec<_> = manifest.dependency_names().collect();
        assert_eq!(names, vec!["axios", "react", "vite"]);
    }
}
