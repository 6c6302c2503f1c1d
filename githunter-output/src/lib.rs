//! GitHunter Output Layer
//!
//! Renders a finalized result set into the supported formats. The data shape
//! and ordering come from the core; these modules only serialize.

pub mod csv;
pub mod json;
pub mod links;
pub mod markdown;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use githunter_core::ResultSet;

/// Errors from output writing
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Timestamp fragment shared by all output file names
pub fn file_timestamp() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Write every output format into `dir`, returning the created paths
pub fn write_all(dir: &Path, results: &ResultSet) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir)?;
    let timestamp = file_timestamp();

    let paths = vec![
        json::write_json(dir, results, &timestamp)?,
        csv::write_csv(dir, results, &timestamp)?,
        markdown::write_markdown(dir, results, &timestamp)?,
        links::write_links(dir, results, &timestamp)?,
    ];

    info!("Generated {} output files", paths.len());
    Ok(paths)
}
