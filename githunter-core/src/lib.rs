//! GitHunter Core - Link extraction and classification for proxy hunting
//!
//! This crate provides the foundational pipeline stages:
//! - Protocol registry (scheme prefix to category table)
//! - Link extraction from repository page markup and plain text
//! - Scheme-based classification with priority scoring
//! - Cross-repository aggregation and deduplication

pub mod aggregator;
pub mod classifier;
pub mod extractor;
pub mod protocol;
pub mod source;

pub use aggregator::*;
pub use classifier::*;
pub use extractor::*;
pub use protocol::*;
pub use source::*;

/// Base priority for links with a recognized proxy scheme
pub const PROTOCOL_PRIORITY: u32 = 10;

/// Priority for links that only look like subscription/config files
pub const SUBSCRIPTION_PRIORITY: u32 = 5;
