//! Markdown report writer

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use githunter_core::ResultSet;

use crate::OutputError;

/// Repositories shown in the report
const TOP_REPOS: usize = 20;

/// Links listed per repository
const LINKS_PER_REPO: usize = 10;

/// Render the Markdown report
pub fn render(results: &ResultSet) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# GitHunter Report\n");
    let _ = writeln!(
        out,
        "**Generated:** {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
    );

    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(
        out,
        "- **Total Repositories:** {}",
        results.summary.total_repositories
    );
    let _ = writeln!(
        out,
        "- **Candidate Links:** {}",
        results.summary.total_candidates
    );
    let _ = writeln!(out, "- **Unique Links:** {}", results.summary.unique_links);
    let _ = writeln!(
        out,
        "- **High Priority Links:** {}\n",
        results.high_priority_urls.len()
    );

    if !results.summary.by_protocol.is_empty() {
        let _ = writeln!(out, "### Protocol Distribution\n");
        for (category, count) in &results.summary.by_protocol {
            let _ = writeln!(out, "- **{}:** {}", category.label(), count);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## Top Repositories\n");

    let mut repos: Vec<_> = results.repositories.iter().collect();
    repos.sort_by(|a, b| b.recognized_count().cmp(&a.recognized_count()));

    for repo in repos.into_iter().take(TOP_REPOS) {
        let _ = writeln!(out, "### [{}]({})\n", repo.meta.id, repo.meta.html_url);
        let _ = writeln!(
            out,
            "**Stars:** {} | **Forks:** {} | **Language:** {}\n",
            repo.meta.stars,
            repo.meta.forks,
            repo.meta.language.as_deref().unwrap_or("N/A")
        );
        if !repo.meta.description.is_empty() {
            let _ = writeln!(out, "{}\n", repo.meta.description);
        }
        let _ = writeln!(out, "**Proxy Links:** {}\n", repo.recognized_count());

        let proxy_links: Vec<_> = repo
            .links
            .iter()
            .filter(|l| l.category.is_recognized())
            .collect();
        if !proxy_links.is_empty() {
            let _ = writeln!(out, "**Links:**");
            for link in proxy_links.iter().take(LINKS_PER_REPO) {
                let _ = writeln!(out, "- `{}`", link.url);
            }
            if proxy_links.len() > LINKS_PER_REPO {
                let _ = writeln!(out, "- ... and {} more", proxy_links.len() - LINKS_PER_REPO);
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "---\n");
    }

    out
}

/// Write the Markdown report into `dir`
pub fn write_markdown(
    dir: &Path,
    results: &ResultSet,
    timestamp: &str,
) -> Result<PathBuf, OutputError> {
    let path = dir.join(format!("githunter_report_{}.md", timestamp));
    std::fs::write(&path, render(results))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use githunter_core::{Aggregator, ClassifiedLink, ProtocolCategory, RepoMeta};

    #[test]
    fn test_render_sections() {
        let mut agg = Aggregator::new();
        agg.ingest(
            &RepoMeta::new("a/b").with_keyword("ss collector", true),
            vec![ClassifiedLink {
                url: "ss://abc@host:8388".to_string(),
                category: ProtocolCategory::Ss,
                priority: 10,
            }],
        )
        .unwrap();

        let rendered = render(&agg.finalize());

        assert!(rendered.contains("# GitHunter Report"));
        assert!(rendered.contains("## Summary"));
        assert!(rendered.contains("**ss:** 1"));
        assert!(rendered.contains("[a/b](https://github.com/a/b)"));
        assert!(rendered.contains("`ss://abc@host:8388`"));
    }
}
