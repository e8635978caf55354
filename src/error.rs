use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, PortfolioError>;

/// Errors that can occur while generating and publishing a project entry
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Config file parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The input does not reference a hosted repository
    #[error("Invalid repository reference: {0}")]
    InvalidReference(String),

    /// The primary metadata lookup returned 404
    #[error("Repository not found or unreachable: {0}")]
    RepositoryNotFound(String),

    /// GitHub API specific errors
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// API rate limit exceeded errors
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The gallery page has no recognizable insertion point
    #[error("Anchor not found in gallery page {}", .0.display())]
    AnchorNotFound(PathBuf),

    /// Staging, commit or push failures
    #[error("Publish error: {0}")]
    Publish(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Interactive prompt failures
    #[error("Prompt error: {0}")]
    Prompt(String),
}
