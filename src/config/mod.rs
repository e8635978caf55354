mod env_manager;

use crate::error::{PortfolioError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use env_manager::{get_env_value, EnvOverrides, GITHUB_API_BASE_VAR, GITHUB_TOKEN_VAR};

/// Default public GitHub REST endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Main configuration struct for the application
///
/// Settings come from three layers, later ones winning: built-in defaults,
/// the optional TOML file under the user's config directory, and the
/// environment. Command-line flags are applied on top by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API token for authenticated requests; only ever read from the environment
    #[serde(skip)]
    pub github_token: Option<String>,
    /// GitHub API client settings
    pub github: GitHubConfig,
    /// Layout of the static site being updated
    pub site: SiteConfig,
    /// Remote and branch names used when publishing
    pub git: GitConfig,
}

/// GitHub API client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base URL of the REST API
    pub api_base: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Layout of the static portfolio site
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root of the site checkout; git commands run here
    pub root: PathBuf,
    /// Directory for generated project pages, relative to `root`
    pub projects_dir: PathBuf,
    /// Gallery page receiving new cards, relative to `root`
    pub gallery_page: PathBuf,
}

/// Publishing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Remote to push to
    pub remote: String,
    /// Branch tried first
    pub primary_branch: String,
    /// Branch tried when pushing to the primary branch fails
    pub fallback_branch: String,
}

impl Config {
    /// Creates a configuration with defaults for the site rooted at `site_root`
    pub fn new(site_root: PathBuf) -> Self {
        Self {
            github_token: None,
            github: GitHubConfig::default(),
            site: SiteConfig {
                root: site_root,
                ..SiteConfig::default()
            },
            git: GitConfig::default(),
        }
    }

    /// Loads configuration from the default config file location, then applies
    /// environment overrides
    ///
    /// A missing config file is not an error; defaults are used instead.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(EnvOverrides::from_env());
        Ok(config)
    }

    /// Location of the optional config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("portfolio-gen").join("config.toml"))
    }

    /// Parses a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PortfolioError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Applies values read from the environment
    pub fn apply_env(&mut self, env: EnvOverrides) {
        if env.github_token.is_some() {
            self.github_token = env.github_token;
        }
        if let Some(api_base) = env.api_base {
            self.github.api_base = api_base;
        }
    }

    /// Replaces the site root
    pub fn with_site_root(mut self, root: PathBuf) -> Self {
        self.site.root = root;
        self
    }

    /// Absolute directory for generated project pages
    pub fn projects_dir(&self) -> PathBuf {
        self.site.root.join(&self.site.projects_dir)
    }

    /// Absolute path of the gallery page
    pub fn gallery_path(&self) -> PathBuf {
        self.site.root.join(&self.site.gallery_page)
    }

    /// Request timeout for the GitHub client
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.github.timeout_secs)
    }

    /// Retrieves the GitHub token, if one is configured
    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    /// Validates the configuration before any work is done
    ///
    /// The site root and gallery page must exist; the projects directory is
    /// created on demand when the page is written.
    pub fn validate(&self) -> Result<()> {
        if !self.site.root.is_dir() {
            return Err(PortfolioError::Config(format!(
                "Site root {} is not a directory",
                self.site.root.display()
            )));
        }
        if !self.gallery_path().is_file() {
            return Err(PortfolioError::Config(format!(
                "Gallery page {} does not exist",
                self.gallery_path().display()
            )));
        }
        if self.git.primary_branch.trim().is_empty() || self.git.remote.trim().is_empty() {
            return Err(PortfolioError::Config("Git remote and primary branch must be set".into()));
        }
        Ok(())
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: format!("portfolio-gen/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            projects_dir: PathBuf::from("projects"),
            gallery_page: PathBuf::from("projects.html"),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            primary_branch: "main".to_string(),
            fallback_branch: "master".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/site"));
        assert_eq!(config.projects_dir(), PathBuf::from("/site/projects"));
        assert_eq!(config.gallery_path(), PathBuf::from("/site/projects.html"));
        assert_eq!(config.git.primary_branch, "main");
        assert_eq!(config.git.fallback_branch, "master");
        assert_eq!(config.github.api_base, DEFAULT_API_BASE);
        assert!(config.github_token().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[site]\ngallery_page = \"index.html\"\n\n[git]\nprimary_branch = \"gh-pages\"\n",
        )?;

        let config = Config::from_file(&path)?;
        assert_eq!(config.site.gallery_page, PathBuf::from("index.html"));
        assert_eq!(config.site.projects_dir, PathBuf::from("projects"));
        assert_eq!(config.git.primary_branch, "gh-pages");
        assert_eq!(config.git.remote, "origin");
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(EnvOverrides {
            github_token: Some("ghp_test".into()),
            api_base: Some("http://127.0.0.1:1234".into()),
        });
        assert_eq!(config.github_token(), Some("ghp_test"));
        assert_eq!(config.github.api_base, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_validate_requires_gallery() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::new(temp_dir.path().to_path_buf());
        assert!(matches!(config.validate(), Err(PortfolioError::Config(_))));

        fs::write(config.gallery_path(), "<html></html>")?;
        assert!(config.validate().is_ok());
        Ok(())
    }
}
