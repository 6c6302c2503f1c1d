//! Repository keyword search
//!
//! Queries the GitHub repository search API for proxy-config collector
//! projects, one query per keyword, deduplicated across keywords.

use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use githunter_core::RepoMeta;

use crate::{GithubConfig, GithubError};

/// Search keywords for collector repositories
pub const SEARCH_KEYWORDS: &[&str] = &[
    "config collector",
    "v2ray collector",
    "proxy collector",
    "shadowsocks collector",
    "vless collector",
    "vmess collector",
    "trojan collector",
    "ss collector",
    "hy2 collector",
    "proxy configs",
    "v2ray configs",
    "shadowsocks configs",
    "subscription",
    "sub merge",
    "config merge",
];

/// Keyword tokens that name a concrete proxy protocol
const PROTOCOL_TERMS: &[&str] = &[
    "v2ray",
    "shadowsocks",
    "vless",
    "vmess",
    "trojan",
    "ss",
    "hy2",
    "hysteria",
    "hysteria2",
];

/// Whether a keyword is a high-confidence protocol match
///
/// Generic keywords like "subscription" surface many unrelated projects;
/// repositories found through them never mark links as high priority.
pub fn is_high_confidence(keyword: &str) -> bool {
    keyword
        .split_whitespace()
        .any(|token| PROTOCOL_TERMS.contains(&token.to_lowercase().as_str()))
}

// Search API response types
#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<RepoItem>,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    full_name: String,
    html_url: String,
    description: Option<String>,
    stargazers_count: u64,
    forks_count: u64,
    language: Option<String>,
}

impl RepoItem {
    fn into_meta(self, keyword: &str) -> RepoMeta {
        RepoMeta {
            id: self.full_name,
            html_url: self.html_url,
            description: self.description.unwrap_or_default(),
            stars: self.stargazers_count,
            forks: self.forks_count,
            language: self.language,
            search_keyword: keyword.to_string(),
            high_confidence: is_high_confidence(keyword),
        }
    }
}

/// Search all keywords and return deduplicated repositories, stars descending
///
/// Per-keyword failures are logged and skipped; the search never fails the
/// whole run unless every request errors out at the client level.
pub async fn search_repositories(
    client: &reqwest::Client,
    config: &GithubConfig,
) -> Result<Vec<RepoMeta>, GithubError> {
    let mut repos: Vec<RepoMeta> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for &keyword in SEARCH_KEYWORDS {
        debug!("Searching for: {}", keyword);

        match search_keyword(client, config, keyword).await {
            Ok(found) => {
                let mut kept = 0;
                for meta in found {
                    if kept >= config.max_per_keyword {
                        break;
                    }
                    if seen.insert(meta.id.clone()) {
                        repos.push(meta);
                        kept += 1;
                    }
                }
                debug!("Kept {} repositories for keyword: {}", kept, keyword);
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", keyword, e);
            }
        }

        // Polite delay between search queries
        tokio::time::sleep(std::time::Duration::from_millis(config.search_delay_ms)).await;
    }

    repos.sort_by(|a, b| b.stars.cmp(&a.stars));
    info!("Total unique repositories found: {}", repos.len());

    Ok(repos)
}

async fn search_keyword(
    client: &reqwest::Client,
    config: &GithubConfig,
    keyword: &str,
) -> Result<Vec<RepoMeta>, GithubError> {
    let url = format!(
        "https://api.github.com/search/repositories?q={}&sort=stars&order=desc&per_page={}",
        urlencoding::encode(keyword),
        config.per_page
    );

    let mut request = client
        .get(&url)
        .header("Accept", "application/vnd.github.v3+json");

    if let Some(token) = &config.token {
        request = request.header("Authorization", format!("token {}", token));
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(GithubError::Status {
            status: response.status().as_u16(),
            url,
        });
    }

    let body: SearchResponse = response
        .json()
        .await
        .map_err(|e| GithubError::Parse(e.to_string()))?;

    Ok(body
        .items
        .into_iter()
        .map(|item| item.into_meta(keyword))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_confidence_keywords() {
        assert!(is_high_confidence("vmess collector"));
        assert!(is_high_confidence("ss collector"));
        assert!(is_high_confidence("V2ray configs"));
        assert!(!is_high_confidence("subscription"));
        assert!(!is_high_confidence("config merge"));
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "items": [{
                "full_name": "alice/collector",
                "html_url": "https://github.com/alice/collector",
                "description": "free v2ray nodes",
                "stargazers_count": 42,
                "forks_count": 7,
                "language": "Python"
            }]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        let meta = parsed
            .items
            .into_iter()
            .next()
            .unwrap()
            .into_meta("vmess collector");

        assert_eq!(meta.id, "alice/collector");
        assert_eq!(meta.stars, 42);
        assert!(meta.high_confidence);
    }

    #[test]
    fn test_null_description_tolerated() {
        let json = r#"{
            "full_name": "a/b",
            "html_url": "https://github.com/a/b",
            "description": null,
            "stargazers_count": 0,
            "forks_count": 0,
            "language": null
        }"#;

        let item: RepoItem = serde_json::from_str(json).unwrap();
        let meta = item.into_meta("subscription");
        assert!(meta.description.is_empty());
        assert!(!meta.high_confidence);
    }
}
