//! Cross-repository aggregation and deduplication
//!
//! Merges per-repository classified link sequences into one result set,
//! deduplicates by URL, and finalizes the emission ordering. Run-scoped
//! state lives in an owned `Aggregator` with an explicit lifecycle
//! (`Empty -> Ingesting -> Finalized`), so parallel runs and tests never
//! interfere through ambient globals.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{ClassifiedLink, ProtocolCategory, RepoMeta};

/// Errors from aggregator misuse
#[derive(Debug, Error)]
pub enum AggregateError {
    /// Structural misuse of the run lifecycle; fatal to the run
    #[error("ingest called after finalize")]
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Empty,
    Ingesting,
    Finalized,
}

/// One repository's contribution, in extraction order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoReport {
    pub meta: RepoMeta,
    pub links: Vec<ClassifiedLink>,
}

impl RepoReport {
    /// Links per category within this repository
    pub fn count_for(&self, category: ProtocolCategory) -> usize {
        self.links.iter().filter(|l| l.category == category).count()
    }

    /// Links with a recognized proxy scheme
    pub fn recognized_count(&self) -> usize {
        self.links.iter().filter(|l| l.category.is_recognized()).count()
    }
}

/// A deduplicated link with every repository that exposed it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalEntry {
    pub url: String,
    pub category: ProtocolCategory,
    /// Highest priority seen across occurrences
    pub priority: u32,
    /// Contributing repository ids in first-seen order
    pub contributing_repos: Vec<String>,
    /// Whether any contributing repository matched a high-confidence keyword
    pub high_confidence: bool,
}

/// Aggregate counts over a finalized run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_repositories: usize,
    /// Candidate occurrences before deduplication
    pub total_candidates: usize,
    pub unique_links: usize,
    pub by_protocol: BTreeMap<ProtocolCategory, usize>,
    /// Unique links per host, for links with a parseable host portion
    pub by_domain: BTreeMap<String, usize>,
}

/// The finalized output of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    /// Per-repository reports in ingest order
    pub repositories: Vec<RepoReport>,
    /// Deduplicated links, grouped by category in enumeration order, then
    /// descending priority, then first-seen order
    pub global: Vec<GlobalEntry>,
    /// Recognized-protocol links from high-confidence repositories
    pub high_priority_urls: Vec<String>,
    pub summary: Summary,
}

/// Run-scoped aggregation state
///
/// `ingest` is called once per scanned repository and requires exclusive
/// access, so ingestion of one repository's links is atomic with respect to
/// other ingest calls.
#[derive(Debug)]
pub struct Aggregator {
    state: RunState,
    repositories: Vec<RepoReport>,
    global: Vec<GlobalEntry>,
    index: HashMap<String, usize>,
    snapshot: Option<ResultSet>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            state: RunState::Empty,
            repositories: Vec::new(),
            global: Vec::new(),
            index: HashMap::new(),
            snapshot: None,
        }
    }

    /// Merge one repository's classified links into the run
    ///
    /// An empty link list is fine (a fetch that was cut short simply
    /// contributes nothing). Calling ingest after finalize is a usage error
    /// and leaves the finalized snapshot untouched.
    pub fn ingest(
        &mut self,
        meta: &RepoMeta,
        links: Vec<ClassifiedLink>,
    ) -> Result<(), AggregateError> {
        if self.state == RunState::Finalized {
            return Err(AggregateError::Finalized);
        }
        self.state = RunState::Ingesting;

        for link in &links {
            self.merge_link(meta, link);
        }

        self.repositories.push(RepoReport {
            meta: meta.clone(),
            links,
        });

        Ok(())
    }

    fn merge_link(&mut self, meta: &RepoMeta, link: &ClassifiedLink) {
        let key = dedup_key(&link.url);

        if let Some(&idx) = self.index.get(&key) {
            let entry = &mut self.global[idx];

            if entry.category != link.category {
                // Logically impossible with a fixed registry; advisory only,
                // the first classification wins.
                warn!(
                    url = %entry.url,
                    first = ?entry.category,
                    conflicting = ?link.category,
                    "ambiguous classification for duplicate link"
                );
            } else if link.priority > entry.priority {
                entry.priority = link.priority;
            }

            if !entry.contributing_repos.iter().any(|id| id == &meta.id) {
                entry.contributing_repos.push(meta.id.clone());
            }
            entry.high_confidence |= meta.high_confidence;
        } else {
            self.index.insert(key, self.global.len());
            self.global.push(GlobalEntry {
                url: link.url.clone(),
                category: link.category,
                priority: link.priority,
                contributing_repos: vec![meta.id.clone()],
                high_confidence: meta.high_confidence,
            });
        }
    }

    /// Finalize the run and return the result snapshot
    ///
    /// Idempotent: repeated calls without further ingests return an
    /// equivalent snapshot.
    pub fn finalize(&mut self) -> ResultSet {
        if let Some(snapshot) = &self.snapshot {
            return snapshot.clone();
        }

        let mut global = self.global.clone();
        // Stable sort keeps first-seen order within equal keys
        global.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| b.priority.cmp(&a.priority))
        });

        let high_priority_urls = global
            .iter()
            .filter(|e| e.category.is_recognized() && e.high_confidence)
            .map(|e| e.url.clone())
            .collect();

        let mut by_protocol: BTreeMap<ProtocolCategory, usize> = BTreeMap::new();
        let mut by_domain: BTreeMap<String, usize> = BTreeMap::new();
        for entry in &global {
            *by_protocol.entry(entry.category).or_insert(0) += 1;
            if let Some(domain) = link_domain(&entry.url) {
                *by_domain.entry(domain).or_insert(0) += 1;
            }
        }

        let summary = Summary {
            total_repositories: self.repositories.len(),
            total_candidates: self.repositories.iter().map(|r| r.links.len()).sum(),
            unique_links: global.len(),
            by_protocol,
            by_domain,
        };

        let snapshot = ResultSet {
            repositories: self.repositories.clone(),
            global,
            high_priority_urls,
            summary,
        };

        self.state = RunState::Finalized;
        self.snapshot = Some(snapshot.clone());
        snapshot
    }
}

/// Lowercased host portion of a URL, if it has one
fn link_domain(url: &str) -> Option<String> {
    url::Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Deduplication key: trimmed URL with the scheme portion lowercased
///
/// The stored/emitted string keeps the original casing of everything after
/// the scheme separator.
fn dedup_key(url: &str) -> String {
    let trimmed = url.trim();
    match trimmed.find("://") {
        Some(pos) => {
            let (scheme, rest) = trimmed.split_at(pos + 3);
            format!("{}{}", scheme.to_lowercase(), rest)
        }
        None => trimmed.to_string(),
    }
}
