use crate::error::{PortfolioError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    /// Recognized reference forms, tried in order; first match wins
    static ref REFERENCE_PATTERNS: Vec<Regex> = vec![
        // https://github.com/owner/repo[.git][/tree/main/...]
        Regex::new(r"^https?://(?:www\.)?[\w.-]+(?::\d+)?/(?P<owner>[\w.-]+)/(?P<repo>[\w.-]+?)(?:\.git)?/?(?:[/?#].*)?$").unwrap(),
        // git@github.com:owner/repo.git or github.com:owner/repo
        Regex::new(r"^(?:[\w.-]+@)?[\w-]+(?:\.[\w-]+)+:(?P<owner>[\w.-]+)/(?P<repo>[\w.-]+?)(?:\.git)?/?$").unwrap(),
        // owner/repo
        Regex::new(r"^(?P<owner>[\w-][\w.-]*)/(?P<repo>[\w.-]+?)(?:\.git)?$").unwrap(),
    ];
}

/// Owner and repository name of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    /// Canonical browser URL on github.com
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Extracts owner and repository name from a repository reference
///
/// Accepts `https://host/owner/repo[.git]`, `git@host:owner/repo[.git]`,
/// `host:owner/repo` and the `owner/repo` shorthand. A trailing `.git` is
/// stripped from the repository name.
pub fn parse_repo_reference(input: &str) -> Result<RepoRef> {
    let input = input.trim();

    for pattern in REFERENCE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(input) {
            let owner = &caps["owner"];
            let repo = &caps["repo"];
            if owner.is_empty() || repo.is_empty() || repo == "." || repo == ".." {
                break;
            }
            return Ok(RepoRef::new(owner, repo));
        }
    }

    Err(PortfolioError::InvalidReference(format!(
        "'{}' is not a repository URL (expected https://github.com/owner/repo)",
        input
    )))
}
