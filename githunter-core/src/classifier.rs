//! Scheme-based link classification
//!
//! Maps each candidate link to exactly one protocol category and assigns an
//! initial priority signal. Classification is a pure function of the URL
//! string and the registry: no I/O, deterministic, and no link is ever
//! dropped (unrecognized schemes classify as `Unknown`).

use serde::{Deserialize, Serialize};

use crate::{
    CandidateLink, PatternRegistry, ProtocolCategory, PROTOCOL_PRIORITY, SUBSCRIPTION_PRIORITY,
};

/// A candidate link with its category and priority score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLink {
    /// Trimmed URL; original casing preserved after the scheme
    pub url: String,
    pub category: ProtocolCategory,
    /// Base priority; ties are broken downstream by extraction order
    pub priority: u32,
}

/// Classifier over an immutable pattern registry
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'r> {
    registry: &'r PatternRegistry,
}

impl<'r> Classifier<'r> {
    pub fn new(registry: &'r PatternRegistry) -> Self {
        Self { registry }
    }

    /// Classify one candidate link
    ///
    /// Whitespace is trimmed and the scheme match is case-insensitive.
    /// Recognized protocols take the protocol base priority; unknown links
    /// that look like subscription files rank between protocols and noise.
    pub fn classify(&self, link: &CandidateLink) -> ClassifiedLink {
        let url = link.url.trim();
        let category = self
            .registry
            .category_for_scheme(url)
            .unwrap_or(ProtocolCategory::Unknown);

        let priority = if category.is_recognized() {
            PROTOCOL_PRIORITY
        } else if self.registry.looks_like_subscription(url) {
            SUBSCRIPTION_PRIORITY
        } else {
            0
        };

        ClassifiedLink {
            url: url.to_string(),
            category,
            priority,
        }
    }

    /// Classify a whole extraction sequence, preserving order
    pub fn classify_all<I>(&self, links: I) -> Vec<ClassifiedLink>
    where
        I: IntoIterator<Item = CandidateLink>,
    {
        links.into_iter().map(|l| self.classify(&l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(url: &str) -> ClassifiedLink {
        let registry = PatternRegistry::new();
        let classifier = Classifier::new(&registry);
        classifier.classify(&CandidateLink::new(url.to_string()))
    }

    #[test]
    fn test_recognized_scheme() {
        let link = classify("ss://abc123@host:8388#node1");
        assert_eq!(link.category, ProtocolCategory::Ss);
        assert_eq!(link.priority, PROTOCOL_PRIORITY);
    }

    #[test]
    fn test_unknown_is_retained() {
        let link = classify("http://example.com");
        assert_eq!(link.category, ProtocolCategory::Unknown);
        assert_eq!(link.priority, 0);
    }

    #[test]
    fn test_mixed_case_scheme() {
        let link = classify("VMESS://payload");
        assert_eq!(link.category, ProtocolCategory::Vmess);
        // Original casing is preserved in the stored URL
        assert_eq!(link.url, "VMESS://payload");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let link = classify("  vless://xyz@1.2.3.4:443?x=1  ");
        assert_eq!(link.category, ProtocolCategory::Vless);
        assert_eq!(link.url, "vless://xyz@1.2.3.4:443?x=1");
    }

    #[test]
    fn test_subscription_priority() {
        let link = classify("https://raw.githubusercontent.com/x/y/main/sub_merge.txt");
        assert_eq!(link.category, ProtocolCategory::Unknown);
        assert_eq!(link.priority, SUBSCRIPTION_PRIORITY);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let registry = PatternRegistry::new();
        let classifier = Classifier::new(&registry);
        let candidate = CandidateLink::new("trojan://pass@host:443".to_string());

        let first = classifier.classify(&candidate);
        let second = classifier.classify(&candidate);
        assert_eq!(first, second);
    }
}
