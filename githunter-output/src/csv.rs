//! CSV report writer
//!
//! One row per scanned repository with its per-category link counts.

use std::path::{Path, PathBuf};

use githunter_core::{ProtocolCategory, ResultSet};

use crate::OutputError;

const HEADER: &[&str] = &[
    "Repository",
    "URL",
    "Description",
    "Stars",
    "Forks",
    "Language",
    "Search Keyword",
    "Total Links",
    "Proxy Links",
    "Unknown Links",
    "High Confidence",
];

/// RFC 4180 field quoting
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render the per-repository CSV
pub fn render(results: &ResultSet) -> String {
    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push('\n');

    for repo in &results.repositories {
        let unknown = repo.count_for(ProtocolCategory::Unknown);
        let row = [
            repo.meta.id.clone(),
            repo.meta.html_url.clone(),
            repo.meta.description.clone(),
            repo.meta.stars.to_string(),
            repo.meta.forks.to_string(),
            repo.meta.language.clone().unwrap_or_default(),
            repo.meta.search_keyword.clone(),
            repo.links.len().to_string(),
            repo.recognized_count().to_string(),
            unknown.to_string(),
            repo.meta.high_confidence.to_string(),
        ];
        let escaped: Vec<String> = row.iter().map(|f| escape(f)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }

    out
}

/// Write the CSV report into `dir`
pub fn write_csv(dir: &Path, results: &ResultSet, timestamp: &str) -> Result<PathBuf, OutputError> {
    let path = dir.join(format!("githunter_results_{}.csv", timestamp));
    std::fs::write(&path, render(results))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use githunter_core::{Aggregator, ClassifiedLink, RepoMeta};

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("has,comma"), "\"has,comma\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_render_rows() {
        let mut agg = Aggregator::new();
        let mut meta = RepoMeta::new("a/b").with_keyword("vmess collector", true);
        meta.description = "nodes, free".to_string();
        agg.ingest(
            &meta,
            vec![ClassifiedLink {
                url: "vmess://x".to_string(),
                category: ProtocolCategory::Vmess,
                priority: 10,
            }],
        )
        .unwrap();

        let rendered = render(&agg.finalize());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Repository,URL"));
        assert!(lines[1].contains("\"nodes, free\""));
        assert!(lines[1].contains("a/b"));
    }
}
