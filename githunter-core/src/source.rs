//! Repository source model
//!
//! Metadata and fetched page text for one scanned repository. Created by the
//! search and fetch stages, consumed read-only by the core pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository metadata from the search stage
///
/// The `high_confidence` flag records whether the repository matched a
/// protocol-specific search keyword; the core passes it through untouched
/// and uses it only when computing the high-priority link set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoMeta {
    /// owner/name identifier
    pub id: String,
    /// Repository landing page URL
    pub html_url: String,
    /// Repository description
    pub description: String,
    /// Star count at search time
    pub stars: u64,
    /// Fork count at search time
    pub forks: u64,
    /// Primary language, if reported
    pub language: Option<String>,
    /// The search keyword that surfaced this repository
    pub search_keyword: String,
    /// Whether the keyword names a concrete proxy protocol
    pub high_confidence: bool,
}

impl RepoMeta {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            html_url: format!("https://github.com/{}", id),
            description: String::new(),
            stars: 0,
            forks: 0,
            language: None,
            search_keyword: String::new(),
            high_confidence: false,
        }
    }

    pub fn with_keyword(mut self, keyword: &str, high_confidence: bool) -> Self {
        self.search_keyword = keyword.to_string();
        self.high_confidence = high_confidence;
        self
    }
}

/// One repository's fetched landing page
///
/// Immutable once captured; an empty `raw_text` marks a fetch that failed or
/// was cut short and simply yields no candidate links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySource {
    pub meta: RepoMeta,
    pub fetched_at: DateTime<Utc>,
    pub raw_text: String,
}

impl RepositorySource {
    pub fn new(meta: RepoMeta, raw_text: String) -> Self {
        Self {
            meta,
            fetched_at: Utc::now(),
            raw_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_meta_builder() {
        let meta = RepoMeta::new("alice/collector").with_keyword("vmess collector", true);
        assert_eq!(meta.id, "alice/collector");
        assert_eq!(meta.html_url, "https://github.com/alice/collector");
        assert!(meta.high_confidence);
    }

    #[test]
    fn test_empty_source() {
        let source = RepositorySource::new(RepoMeta::new("a/b"), String::new());
        assert!(source.raw_text.is_empty());
    }
}
