/// Environment variable holding the GitHub access token
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
/// Environment variable overriding the GitHub API base URL
pub const GITHUB_API_BASE_VAR: &str = "GITHUB_API_BASE_URL";

/// Values read from the process environment at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Token for authenticated, higher rate-limit API calls
    pub github_token: Option<String>,
    /// Alternate API base, mostly for tests against a mock server
    pub api_base: Option<String>,
}

impl EnvOverrides {
    /// Reads the overrides from the current environment
    pub fn from_env() -> Self {
        Self {
            github_token: get_env_value(GITHUB_TOKEN_VAR),
            api_base: get_env_value(GITHUB_API_BASE_VAR),
        }
    }
}

/// Returns the variable's value, treating empty or whitespace-only values as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
