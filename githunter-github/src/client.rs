//! GitHub HTTP client configuration
//!
//! Builds reqwest clients for the search API and for landing-page fetches.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// GitHub access configuration
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Personal access token (optional, raises the rate limit)
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Results requested per search page
    pub per_page: usize,
    /// Repositories kept per search keyword
    pub max_per_keyword: usize,
    /// Delay between keyword queries in milliseconds
    pub search_delay_ms: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: std::env::var("GITHUB_TOKEN").ok(),
            timeout_secs: 30,
            per_page: 30,
            max_per_keyword: 3,
            search_delay_ms: 2000,
        }
    }
}

/// Errors from GitHub networking
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// User agents for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:137.0) Gecko/20100101 Firefox/137.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.7; rv:137.0) Gecko/20100101 Firefox/137.0",
];

/// Get a random user agent
pub fn random_user_agent() -> &'static str {
    use rand::Rng;
    let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
    USER_AGENTS[idx]
}

/// Create an HTTP client for GitHub requests
pub fn build_client(config: &GithubConfig) -> Result<Client, GithubError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(random_user_agent())
        .build()
        .map_err(|e| GithubError::ClientBuild(e.to_string()))
}

/// Check that the GitHub API is reachable; returns remaining search quota
pub async fn check_rate_limit(config: &GithubConfig) -> Result<Option<u64>, GithubError> {
    let client = build_client(config)?;

    let mut request = client
        .get("https://api.github.com/rate_limit")
        .header("Accept", "application/vnd.github.v3+json");

    if let Some(token) = &config.token {
        request = request.header("Authorization", format!("token {}", token));
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(GithubError::Status {
            status: response.status().as_u16(),
            url: "https://api.github.com/rate_limit".to_string(),
        });
    }

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| GithubError::Parse(e.to_string()))?;

    Ok(body
        .pointer("/resources/search/remaining")
        .and_then(|v| v.as_u64()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GithubConfig {
            token: None,
            ..Default::default()
        };
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_per_keyword, 3);
    }

    #[test]
    fn test_random_user_agent() {
        let ua = random_user_agent();
        assert!(ua.contains("Mozilla"));
    }
}
