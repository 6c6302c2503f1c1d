//! Plain-text high-priority link list writer

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use githunter_core::ResultSet;

use crate::OutputError;

/// Render the high-priority link list with a commented header
pub fn render(results: &ResultSet) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# GitHunter - High Priority Proxy Links");
    let _ = writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339());
    let _ = writeln!(out, "# Total Links: {}\n", results.high_priority_urls.len());

    for url in &results.high_priority_urls {
        let _ = writeln!(out, "{}", url);
    }

    out
}

/// Write the link list into `dir`
pub fn write_links(
    dir: &Path,
    results: &ResultSet,
    timestamp: &str,
) -> Result<PathBuf, OutputError> {
    let path = dir.join(format!("high_priority_links_{}.txt", timestamp));
    std::fs::write(&path, render(results))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use githunter_core::{Aggregator, ClassifiedLink, ProtocolCategory, RepoMeta};

    #[test]
    fn test_render_links() {
        let mut agg = Aggregator::new();
        agg.ingest(
            &RepoMeta::new("a/b").with_keyword("trojan collector", true),
            vec![
                ClassifiedLink {
                    url: "trojan://p@host:443".to_string(),
                    category: ProtocolCategory::Trojan,
                    priority: 10,
                },
                ClassifiedLink {
                    url: "http://noise.example.com".to_string(),
                    category: ProtocolCategory::Unknown,
                    priority: 0,
                },
            ],
        )
        .unwrap();

        let rendered = render(&agg.finalize());

        assert!(rendered.starts_with("# GitHunter"));
        assert!(rendered.contains("# Total Links: 1"));
        assert!(rendered.contains("trojan://p@host:443"));
        assert!(!rendered.contains("noise.example.com"));
    }
}
