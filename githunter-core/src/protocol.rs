//! Proxy protocol registry
//!
//! Holds the authoritative mapping of URL scheme prefixes to protocol
//! categories, plus heuristics for spotting subscription/config files.

use serde::{Deserialize, Serialize};

/// Categories of proxy-configuration links
///
/// Closed set; declaration order is the emission order used when grouping
/// aggregated results. `Unknown` is a valid terminal classification for any
/// link without a recognized scheme, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolCategory {
    /// Shadowsocks (ss://)
    Ss,
    /// VLESS (vless://)
    Vless,
    /// VMess (vmess://)
    Vmess,
    /// Trojan (trojan://)
    Trojan,
    /// Hysteria v1 (hysteria://)
    Hysteria,
    /// Hysteria v2 (hy2:// or hysteria2://)
    Hysteria2,
    /// V2Ray (v2ray://)
    V2ray,
    /// No recognized proxy scheme
    Unknown,
}

impl ProtocolCategory {
    /// All categories in emission order
    pub const ALL: [ProtocolCategory; 8] = [
        ProtocolCategory::Ss,
        ProtocolCategory::Vless,
        ProtocolCategory::Vmess,
        ProtocolCategory::Trojan,
        ProtocolCategory::Hysteria,
        ProtocolCategory::Hysteria2,
        ProtocolCategory::V2ray,
        ProtocolCategory::Unknown,
    ];

    /// Whether this is a recognized proxy protocol
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ProtocolCategory::Unknown)
    }

    /// Display label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            ProtocolCategory::Ss => "ss",
            ProtocolCategory::Vless => "vless",
            ProtocolCategory::Vmess => "vmess",
            ProtocolCategory::Trojan => "trojan",
            ProtocolCategory::Hysteria => "hysteria",
            ProtocolCategory::Hysteria2 => "hysteria2",
            ProtocolCategory::V2ray => "v2ray",
            ProtocolCategory::Unknown => "unknown",
        }
    }
}

/// Scheme prefix table in match order
///
/// `hysteria2://` must come before `hysteria://` so the longer prefix wins.
const SCHEME_TABLE: &[(&str, ProtocolCategory)] = &[
    ("ss://", ProtocolCategory::Ss),
    ("vless://", ProtocolCategory::Vless),
    ("vmess://", ProtocolCategory::Vmess),
    ("trojan://", ProtocolCategory::Trojan),
    ("hy2://", ProtocolCategory::Hysteria2),
    ("hysteria2://", ProtocolCategory::Hysteria2),
    ("hysteria://", ProtocolCategory::Hysteria),
    ("v2ray://", ProtocolCategory::V2ray),
];

/// File extensions that commonly hold proxy configs
const CONFIG_EXTENSIONS: &[&str] = &[".txt", ".sub", ".conf", ".yaml", ".yml", ".json"];

/// Keywords that indicate merged subscription files
const MERGE_KEYWORDS: &[&str] = &[
    "all",
    "merge",
    "merged",
    "subscription",
    "sub",
    "collection",
    "aggregate",
    "combined",
    "complete",
    "config",
    "proxy",
    "node",
    "list",
];

/// Immutable scheme-to-category registry
///
/// Constructed once at startup and passed by reference into the classifier,
/// so tests can swap registries without touching process-wide state. No
/// mutation API is exposed.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    _priv: (),
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the protocol category for a URL by scheme prefix
    ///
    /// Exact, case-insensitive prefix match against the fixed table. Leading
    /// and trailing whitespace is trimmed before matching.
    pub fn category_for_scheme(&self, url: &str) -> Option<ProtocolCategory> {
        let lower = url.trim().to_lowercase();
        SCHEME_TABLE
            .iter()
            .find(|(prefix, _)| lower.starts_with(prefix))
            .map(|(_, category)| *category)
    }

    /// Heuristic for subscription/config file URLs
    ///
    /// A link counts when it carries a config file extension together with a
    /// merge keyword, or points at a raw file host with a merge keyword in
    /// the path.
    pub fn looks_like_subscription(&self, url: &str) -> bool {
        let lower = url.trim().to_lowercase();
        let has_extension = CONFIG_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
        let has_keyword = MERGE_KEYWORDS.iter().any(|kw| lower.contains(kw));
        let raw_host = lower.contains("raw.githubusercontent.com") || lower.contains("/raw/");

        (has_extension && has_keyword) || (raw_host && has_keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_table() {
        let registry = PatternRegistry::new();
        assert_eq!(
            registry.category_for_scheme("ss://abc@host:8388#node1"),
            Some(ProtocolCategory::Ss)
        );
        assert_eq!(
            registry.category_for_scheme("vless://xyz@1.2.3.4:443?x=1"),
            Some(ProtocolCategory::Vless)
        );
        assert_eq!(
            registry.category_for_scheme("trojan://pass@host:443"),
            Some(ProtocolCategory::Trojan)
        );
        assert_eq!(
            registry.category_for_scheme("v2ray://payload"),
            Some(ProtocolCategory::V2ray)
        );
        assert_eq!(registry.category_for_scheme("http://example.com"), None);
    }

    #[test]
    fn test_case_insensitive_match() {
        let registry = PatternRegistry::new();
        assert_eq!(
            registry.category_for_scheme("VMESS://payload"),
            Some(ProtocolCategory::Vmess)
        );
        assert_eq!(
            registry.category_for_scheme("  Ss://trimmed  "),
            Some(ProtocolCategory::Ss)
        );
    }

    #[test]
    fn test_hysteria_prefixes_are_disjoint() {
        let registry = PatternRegistry::new();
        assert_eq!(
            registry.category_for_scheme("hysteria2://h@host:443"),
            Some(ProtocolCategory::Hysteria2)
        );
        assert_eq!(
            registry.category_for_scheme("hy2://h@host:443"),
            Some(ProtocolCategory::Hysteria2)
        );
        assert_eq!(
            registry.category_for_scheme("hysteria://h@host:443"),
            Some(ProtocolCategory::Hysteria)
        );
    }

    #[test]
    fn test_subscription_heuristic() {
        let registry = PatternRegistry::new();
        assert!(registry.looks_like_subscription(
            "https://raw.githubusercontent.com/x/y/main/sub_merge.txt"
        ));
        assert!(registry.looks_like_subscription("https://host/configs/all.yaml"));
        assert!(!registry.looks_like_subscription("https://example.com/about.html"));
    }

    #[test]
    fn test_category_order() {
        // Emission grouping relies on declaration order
        assert!(ProtocolCategory::Ss < ProtocolCategory::Vless);
        assert!(ProtocolCategory::V2ray < ProtocolCategory::Unknown);
        assert_eq!(ProtocolCategory::ALL.len(), 8);
    }
}
