// src/trend.rs
// Core data model: ranked trend entries and their (source, region) addressing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a ranked list comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Google,
    Youtube,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Google => "google",
            Source::Youtube => "youtube",
        }
    }
}

/// One (source, region) ranking, e.g. YouTube trending in KR.
/// Region codes follow the upstream feeds ("KR", "US", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrendKey {
    pub source: Source,
    pub region: String,
}

impl TrendKey {
    pub fn new(source: Source, region: impl Into<String>) -> Self {
        Self {
            source,
            region: region.into(),
        }
    }

    /// Stable stem used for state files and dedup namespaces: `{source}_{region}`.
    pub fn stem(&self) -> String {
        format!("{}_{}", self.source.as_str(), self.region)
    }
}

impl std::fmt::Display for TrendKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.source.as_str(), self.region)
    }
}

/// One ranked entry.
///
/// `identity` is the stable key across snapshots: the video id for YouTube,
/// the normalized title for Google Trends. `description` carries anything the
/// renderer may want to show (channel, views, traffic estimate) and is opaque
/// to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendItem {
    pub identity: String,
    pub rank: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Ordered ranked list for one key, replaced wholesale on every successful
/// cycle. Items are in rank order, ranks dense 1..N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub captured_at: DateTime<Utc>,
    pub items: Vec<TrendItem>,
}

impl Snapshot {
    pub fn new(items: Vec<TrendItem>) -> Self {
        Self {
            captured_at: Utc::now(),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Why an item is being surfaced to the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reason {
    /// Part of a full-refresh (or bootstrap) dump of the whole list.
    Full,
    /// Entered the ranking since the previous snapshot.
    Entered,
    /// Moved up: `from` (old rank) > `to` (new rank).
    Improved { from: u32, to: u32 },
    /// Moved down.
    Worsened { from: u32, to: u32 },
    /// Part of the daily summary of the stored list.
    Summary,
}

/// Normalize a display title into a stable identity for sources that have no
/// intrinsic id (Google Trends). HTML entities decoded, fancy quotes folded,
/// whitespace collapsed, trailing sentence punctuation stripped.
pub fn normalize_title(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    while let Some(last) = out.chars().last() {
        if matches!(last, '!' | '?' | '.' | ',') {
            out.pop();
        } else {
            break;
        }
    }

    // Length cap: 300 chars is far above anything the feeds emit.
    if out.chars().count() > 300 {
        out = out.chars().take(300).collect();
    }

    out
}
