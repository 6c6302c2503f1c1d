//! JSON report writer

use std::path::{Path, PathBuf};

use serde::Serialize;

use githunter_core::ResultSet;

use crate::OutputError;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    results: &'a ResultSet,
}

/// Render the full result set as pretty-printed JSON
pub fn render(results: &ResultSet) -> Result<String, OutputError> {
    let report = JsonReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        results,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write the JSON report into `dir`
pub fn write_json(
    dir: &Path,
    results: &ResultSet,
    timestamp: &str,
) -> Result<PathBuf, OutputError> {
    let path = dir.join(format!("githunter_results_{}.json", timestamp));
    std::fs::write(&path, render(results)?)?;
    Ok(path)
}
