//! GitHunter GitHub Layer
//!
//! Networking collaborators around the core pipeline:
//! - Authenticated HTTP client with rotating user agents
//! - Keyword search against the repository search API
//! - Landing-page fetching with bounded concurrency

pub mod client;
pub mod fetcher;
pub mod search;

pub use client::*;
pub use fetcher::*;
pub use search::*;
