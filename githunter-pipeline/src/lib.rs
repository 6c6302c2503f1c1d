//! GitHunter Pipeline
//!
//! Orchestrates one discovery run: keyword search, concurrent page fetching,
//! per-repository extraction and classification, then serialized aggregation
//! into a finalized result set.
//!
//! Extraction and classification of one repository are independent of every
//! other repository; only the aggregator's ingest step touches shared state
//! and runs serialized through its exclusive `&mut` access.

use thiserror::Error;
use tracing::info;

use githunter_core::{
    AggregateError, Aggregator, ClassifiedLink, Classifier, LinkExtractor, PatternRegistry,
    RepositorySource, ResultSet,
};
use githunter_github::{build_client, fetch_sources, search_repositories, GithubConfig, GithubError};

/// Errors that abort a pipeline run
///
/// Per-repository fetch failures never appear here; they degrade to empty
/// sources. Only search-stage client failures and aggregator misuse are
/// fatal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("GitHub error: {0}")]
    Github(#[from] GithubError),

    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),
}

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub github: GithubConfig,
    /// Concurrent landing-page fetches
    pub fetch_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            github: GithubConfig::default(),
            fetch_concurrency: 5,
        }
    }
}

/// One discovery run
pub struct Pipeline {
    config: PipelineConfig,
    registry: PatternRegistry,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            registry: PatternRegistry::new(),
        }
    }

    /// Execute the full run and return the finalized result set
    pub async fn run(&self) -> Result<ResultSet, PipelineError> {
        let client = build_client(&self.config.github)?;

        let repos = search_repositories(&client, &self.config.github).await?;
        info!("Found {} repositories", repos.len());

        let sources = fetch_sources(&client, &repos, self.config.fetch_concurrency).await;
        info!("Fetched {} sources", sources.len());

        let mut aggregator = Aggregator::new();
        for source in &sources {
            let links = self.process_source(source);
            aggregator.ingest(&source.meta, links)?;
        }

        let results = aggregator.finalize();
        info!(
            "Aggregated {} unique links from {} candidates",
            results.summary.unique_links, results.summary.total_candidates
        );

        Ok(results)
    }

    /// Extract and classify one repository's links
    ///
    /// Pure per-repository stage: no shared state, safe to run for any
    /// number of sources independently.
    pub fn process_source(&self, source: &RepositorySource) -> Vec<ClassifiedLink> {
        let extractor = LinkExtractor::new();
        let classifier = Classifier::new(&self.registry);
        classifier.classify_all(extractor.scan_source(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use githunter_core::{ProtocolCategory, RepoMeta};

    #[test]
    fn test_process_source() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        let source = RepositorySource::new(
            RepoMeta::new("a/b"),
            "nodes: vmess://one and https://host/sub.txt".to_string(),
        );

        let links = pipeline.process_source(&source);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].category, ProtocolCategory::Vmess);
        assert_eq!(links[1].category, ProtocolCategory::Unknown);
    }

    #[test]
    fn test_process_empty_source() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        let source = RepositorySource::new(RepoMeta::new("a/b"), String::new());
        assert!(pipeline.process_source(&source).is_empty());
    }

    #[test]
    fn test_full_aggregation_from_sources() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        let shared = "vless://xyz@1.2.3.4:443?x=1";

        let s1 = RepositorySource::new(
            RepoMeta::new("r1").with_keyword("vless collector", true),
            format!("list: {}", shared),
        );
        let s2 = RepositorySource::new(
            RepoMeta::new("r2").with_keyword("subscription", false),
            format!("mirror of {}", shared),
        );

        let mut aggregator = Aggregator::new();
        for source in [&s1, &s2] {
            aggregator
                .ingest(&source.meta, pipeline.process_source(source))
                .unwrap();
        }

        let results = aggregator.finalize();
        assert_eq!(results.global.len(), 1);
        assert_eq!(results.global[0].contributing_repos, vec!["r1", "r2"]);
        assert_eq!(results.high_priority_urls, vec![shared]);
    }
}
