use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use mockito::{Mock, Server, ServerGuard};
use portfolio_gen::config::Config;
use portfolio_gen::error::{PortfolioError, Result};
use portfolio_gen::publish::VersionControl;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub mod test_helpers {
    use super::*;

    pub const GALLERY: &str = "<!DOCTYPE html>\n<html>\n<body>\n    <section id=\"projects\">\n        <div class=\"projects-grid\">\n            <article class=\"project-card\">existing</article>\n        </div>\n        <!-- End Projects Grid -->\n    </section>\n</body>\n</html>\n";

    pub const README: &str = "# Job Tracker\n\n\
A small web app that keeps every job application, interview and offer in one place.\n\n\
## Features\n\n\
- **Kanban board**: drag applications between stages\n\
- **Reminders**: email nudges before interviews\n\n\
## Installation\n\n\
```bash\n\
npm install\n\
npm run dev\n\
```\n";

    pub fn setup_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    /// A site checkout with a gallery page and one existing project
    pub fn create_test_site() -> TempDir {
        let site = TempDir::new().unwrap();
        std::fs::write(site.path().join("projects.html"), GALLERY).unwrap();
        std::fs::create_dir(site.path().join("projects")).unwrap();
        std::fs::write(site.path().join("projects/day-4-old-thing.html"), "<html></html>").unwrap();
        site
    }

    pub fn create_test_config(site: &Path, server: &ServerGuard) -> Config {
        let mut config = Config::new(site.to_path_buf());
        config.github.api_base = server.url();
        config
    }

    pub fn encode(text: &str) -> String {
        STANDARD.encode(text)
    }

    /// Mocks every endpoint the fetcher calls for `octo/job-tracker`
    pub async fn mock_repository(server: &mut ServerGuard) -> Vec<Mock> {
        let repo = server
            .mock("GET", "/repos/octo/job-tracker")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"name": "job-tracker", "full_name": "octo/job-tracker",
                    "description": "Track job applications without spreadsheets",
                    "html_url": "https://github.com/octo/job-tracker",
                    "topics": ["react", "nodejs"], "stargazers_count": 5, "forks_count": 1}"#,
            )
            .create_async()
            .await;
        let readme = server
            .mock("GET", "/repos/octo/job-tracker/readme")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"content": "{}", "encoding": "base64"}}"#, encode(README)))
            .create_async()
            .await;
        let package = server
            .mock("GET", "/repos/octo/job-tracker/contents/package.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"content": "{}", "encoding": "base64"}}"#,
                encode(r#"{"dependencies": {"express": "^4", "mongoose": "^8"}}"#)
            ))
            .create_async()
            .await;
        let requirements = server
            .mock("GET", "/repos/octo/job-tracker/contents/requirements.txt")
            .with_status(404)
            .create_async()
            .await;
        let languages = server
            .mock("GET", "/repos/octo/job-tracker/languages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"JavaScript": 52000, "CSS": 8000, "HTML": 3000}"#)
            .create_async()
            .await;
        vec![repo, readme, package, requirements, languages]
    }

    pub async fn setup_test_server() -> ServerGuard {
        Server::new_async().await
    }

    /// Every file under `dir` with its contents
    pub fn snapshot_tree(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files: Vec<_> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| (e.path().to_path_buf(), std::fs::read(e.path()).unwrap()))
            .collect();
        files.sort();
        files
    }

    /// Version control double that records calls and rejects chosen branches
    #[derive(Clone, Default)]
    pub struct RecordingVcs {
        pub calls: Arc<Mutex<Vec<String>>>,
        pub rejected_branches: Vec<String>,
    }

    impl RecordingVcs {
        pub fn rejecting(branches: &[&str]) -> Self {
            Self {
                calls: Arc::default(),
                rejected_branches: branches.iter().map(|b| b.to_string()).collect(),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VersionControl for RecordingVcs {
        async fn stage(&self, path: &Path) -> Result<()> {
            self.calls.lock().unwrap().push(format!("add {}", path.display()));
            Ok(())
        }

        async fn commit(&self, message: &str) -> Result<()> {
            let first_line = message.lines().next().unwrap_or_default();
            self.calls.lock().unwrap().push(format!("commit {}", first_line));
            Ok(())
        }

        async fn push(&self, remote: &str, branch: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("push {} {}", remote, branch));
            if self.rejected_branches.iter().any(|b| b == branch) {
                return Err(PortfolioError::Publish(format!("{} rejected", branch)));
            }
            Ok(())
        }
    }
}
