//! Link extraction from repository page text
//!
//! Scans arbitrary markup or plain text and produces every hyperlink-like
//! substring as a candidate link. Extraction is total: malformed input never
//! fails, it just yields fewer candidates. Exact duplicates within one source
//! are kept; deduplication happens in the aggregator.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::RepositorySource;

/// Characters stripped from the end of a matched URL
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\'', '"'];

/// Context window (bytes) captured around a plain-text match
const CONTEXT_WINDOW: usize = 40;

/// Combined pattern for proxy schemes, plain URLs and bare www hosts
///
/// Proxy links frequently appear as plain-text list items rather than anchor
/// tags, so the scan runs over the raw text regardless of markup.
static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:ss|vless|vmess|trojan|hy2|hysteria2?|v2ray)://[^\s<>"'`]+|https?://[^\s<>"'`]+|www\.[^\s<>"'`]+"#,
    )
    .unwrap()
});

/// Markup attributes that may carry a URL
const URL_ATTRIBUTES: &[&str] = &["href", "src", "data-src", "content"];

/// An extracted hyperlink occurrence prior to classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    /// Absolute or relative URL string; never mutated after extraction
    pub url: String,
    /// Surrounding text snippet, for debugging
    pub context: Option<String>,
    /// Identifier of the repository the link came from
    pub source: Option<String>,
}

impl CandidateLink {
    pub fn new(url: String) -> Self {
        Self {
            url,
            context: None,
            source: None,
        }
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}

/// Scans page text for candidate links
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkExtractor;

impl LinkExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Scan raw text for candidate links
    ///
    /// Returns a lazy, finite iterator; re-scanning the same text yields the
    /// same sequence. When the input looks like an HTML document, markup
    /// hyperlink attributes are walked in document order first (with relative
    /// URLs resolved against `base_url`), followed by bare URL matches over
    /// the raw text in position order.
    pub fn scan<'t>(&self, text: &'t str, base_url: Option<&str>) -> LinkScan<'t> {
        self.scan_inner(text, base_url, None)
    }

    /// Scan a fetched repository source, tagging links with the repo id
    pub fn scan_source<'t>(&self, source: &'t RepositorySource) -> LinkScan<'t> {
        self.scan_inner(
            &source.raw_text,
            Some(&source.meta.html_url),
            Some(source.meta.id.clone()),
        )
    }

    fn scan_inner<'t>(
        &self,
        text: &'t str,
        base_url: Option<&str>,
        source: Option<String>,
    ) -> LinkScan<'t> {
        let markup = if looks_like_html(text) {
            extract_markup_links(text, base_url)
        } else {
            Vec::new()
        };

        let text_source = source.clone();
        let inner = markup
            .into_iter()
            .map(move |mut link| {
                link.source = source.clone();
                link
            })
            .chain(LINK_REGEX.find_iter(text).map(move |m| {
                let mut link = CandidateLink::new(clean_url(m.as_str()))
                    .with_context(&snippet(text, m.start(), m.end()));
                link.source = text_source.clone();
                link
            }));

        LinkScan {
            inner: Box::new(inner),
        }
    }
}

/// Iterator over candidate links for one source
pub struct LinkScan<'t> {
    inner: Box<dyn Iterator<Item = CandidateLink> + 't>,
}

impl Iterator for LinkScan<'_> {
    type Item = CandidateLink;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Crude document check: only full HTML pages get the markup pass
fn looks_like_html(text: &str) -> bool {
    let head = text.trim_start();
    let lower: String = head.chars().take(16).collect::<String>().to_lowercase();
    lower.starts_with("<!doctype") || lower.starts_with("<html")
}

/// Walk markup elements in document order and collect URL attributes
fn extract_markup_links(html: &str, base_url: Option<&str>) -> Vec<CandidateLink> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a, link, img, script, source").unwrap();

    let mut links = Vec::new();

    for element in document.select(&selector) {
        for &attr in URL_ATTRIBUTES {
            let value = match element.value().attr(attr) {
                Some(v) => v.trim(),
                None => continue,
            };

            if value.is_empty() || value.starts_with('#') {
                continue;
            }

            let url = resolve_url(value, base_url);
            let text = element.text().collect::<String>();
            let text = text.trim();

            let mut link = CandidateLink::new(url);
            if !text.is_empty() {
                link = link.with_context(text);
            }
            links.push(link);
        }
    }

    links
}

/// Resolve a markup attribute value to an absolute URL where possible
fn resolve_url(value: &str, base_url: Option<&str>) -> String {
    if value.contains("://") {
        return value.to_string();
    }

    let lower = value.to_lowercase();
    if lower.starts_with("www.") {
        return format!("https://{}", value);
    }

    if let Some(base) = base_url {
        if let Ok(joined) = url::Url::parse(base).and_then(|b| b.join(value)) {
            return joined.to_string();
        }
    }

    // Relative URL with no usable base: keep as-is
    value.to_string()
}

/// Strip trailing punctuation and normalize bare www hosts
fn clean_url(raw: &str) -> String {
    let cleaned = raw.trim_end_matches(TRAILING_PUNCTUATION);
    if cleaned.to_lowercase().starts_with("www.") {
        format!("https://{}", cleaned)
    } else {
        cleaned.to_string()
    }
}

/// Whitespace-normalized text window around a match
fn snippet(text: &str, start: usize, end: usize) -> String {
    let mut a = start.saturating_sub(CONTEXT_WINDOW);
    while a > 0 && !text.is_char_boundary(a) {
        a -= 1;
    }
    let mut b = (end + CONTEXT_WINDOW).min(text.len());
    while b < text.len() && !text.is_char_boundary(b) {
        b += 1;
    }
    text[a..b].split_whitespace().collect::<Vec<_>>().join(" ")
}
