//! Repository landing-page fetcher
//!
//! Retrieves each repository's main page markup. Failed or partial fetches
//! yield an empty source rather than aborting the run.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use githunter_core::{RepoMeta, RepositorySource};

use crate::GithubError;

/// Fetch one repository's landing page
///
/// Non-success responses and undecodable bodies produce an empty
/// `raw_text`; the repository then simply contributes zero candidate links.
pub async fn fetch_source(
    client: &reqwest::Client,
    meta: &RepoMeta,
) -> Result<RepositorySource, GithubError> {
    debug!("Fetching source for: {}", meta.id);

    let response = client.get(&meta.html_url).send().await?;

    if !response.status().is_success() {
        warn!("Fetch of {} returned status: {}", meta.id, response.status());
        return Ok(RepositorySource::new(meta.clone(), String::new()));
    }

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            warn!("Body of {} not decodable as text: {}", meta.id, e);
            String::new()
        }
    };

    Ok(RepositorySource::new(meta.clone(), text))
}

/// Fetch multiple landing pages with bounded concurrency
///
/// Results come back in the input order regardless of completion order, so
/// downstream ingestion is reproducible across runs.
pub async fn fetch_sources(
    client: &reqwest::Client,
    repos: &[RepoMeta],
    max_concurrent: usize,
) -> Vec<RepositorySource> {
    let mut fetched: Vec<(usize, RepositorySource)> = stream::iter(repos.iter().enumerate())
        .map(|(idx, meta)| {
            let client = client.clone();
            let meta = meta.clone();
            async move {
                let source = match fetch_source(&client, &meta).await {
                    Ok(source) => source,
                    Err(e) => {
                        warn!("Failed to fetch {}: {}", meta.id, e);
                        RepositorySource::new(meta.clone(), String::new())
                    }
                };
                (idx, source)
            }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    fetched.sort_by_key(|(idx, _)| *idx);
    fetched.into_iter().map(|(_, source)| source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_shape() {
        let meta = RepoMeta::new("a/b");
        let source = RepositorySource::new(meta, String::new());
        assert!(source.raw_text.is_empty());
        assert_eq!(source.meta.id, "a/b");
    }
}
