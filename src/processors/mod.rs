//! Stages that turn a repository reference into project data: parsing the
//! reference, fetching from the GitHub API, scraping the README and detecting
//! the tech stack.

/// Repository reference parsing
pub mod url;
/// GitHub REST API client
pub mod github;
/// Heuristic README analysis
pub mod readme;
/// Tech-stack badge detection
pub mod tech_stack;

pub use github::{GitHubClient, PackageManifest, RepositoryMetadata, RepositorySnapshot};
pub use readme::ReadmeSummary;
pub use url::{parse_repo_reference, RepoRef};
