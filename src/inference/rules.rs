//! Swappable rule tables for the inference heuristics
//!
//! Each heuristic is an ordered list of patterns. The first pattern that
//! matches decides the outcome, so callers can reorder, remove or extend the
//! rules without touching the engine.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SINGLE_UNDERSCORE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*_id$").unwrap());

static VERSION_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[vV]\d+$").unwrap());

/// Pattern recognizing a primary-key candidate by column name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKeyPattern {
    /// The column name equals this string
    Exact(String),
    /// `<word>_id` with exactly one underscore
    SingleUnderscoreId,
}

impl PrimaryKeyPattern {
    pub fn matches(&self, column: &str) -> bool {
        match self {
            PrimaryKeyPattern::Exact(name) => column == name,
            PrimaryKeyPattern::SingleUnderscoreId => SINGLE_UNDERSCORE_ID.is_match(column),
        }
    }
}

/// Pattern recognizing a path segment that carries no resource meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentPattern {
    /// The segment equals this string, ignoring case
    Exact(String),
    /// `v` followed by digits, such as `v1` or `v20`
    VersionNumber,
}

impl SegmentPattern {
    pub fn matches(&self, segment: &str) -> bool {
        match self {
            SegmentPattern::Exact(word) => segment.eq_ignore_ascii_case(word),
            SegmentPattern::VersionNumber => VERSION_NUMBER.is_match(segment),
        }
    }
}

/// One step of the pluralization table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralRule {
    /// Words already ending with this suffix are left unchanged
    KeepIfEndsWith(String),
    /// Replace a trailing `from` with `to`
    ReplaceSuffix { from: String, to: String },
    /// Append the suffix unconditionally
    Append(String),
}

impl PluralRule {
    /// Apply the rule, or `None` when it does not match the word
    pub fn apply(&self, word: &str) -> Option<String> {
        match self {
            PluralRule::KeepIfEndsWith(suffix) => {
                word.ends_with(suffix.as_str()).then(|| word.to_string())
            }
            PluralRule::ReplaceSuffix { from, to } => word
                .strip_suffix(from.as_str())
                .map(|stem| format!("{}{}", stem, to)),
            PluralRule::Append(suffix) => Some(format!("{}{}", word, suffix)),
        }
    }
}

/// The rule tables driving ingestion, naming and key detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceRules {
    /// Envelope keys holding the item list, in priority order
    pub container_keys: Vec<String>,
    /// Envelope keys carrying pagination metadata
    pub metadata_keys: Vec<String>,
    /// Path segments dropped before naming
    pub version_markers: Vec<SegmentPattern>,
    /// Trailing words stripped from resource names
    pub strip_suffixes: Vec<String>,
    /// Primary-key candidates, highest priority first
    pub primary_keys: Vec<PrimaryKeyPattern>,
    /// Pluralization steps, first match wins
    pub plural_rules: Vec<PluralRule>,
}

impl Default for InferenceRules {
    fn default() -> Self {
        Self {
            container_keys: ["data", "items", "results", "records", "rows"]
                .into_iter()
                .map(String::from)
                .collect(),
            metadata_keys: ["total", "count", "page", "limit", "hasMore", "next", "previous"]
                .into_iter()
                .map(String::from)
                .collect(),
            version_markers: vec![
                SegmentPattern::Exact("api".to_string()),
                SegmentPattern::VersionNumber,
            ],
            strip_suffixes: ["list", "data", "response"]
                .into_iter()
                .map(String::from)
                .collect(),
            primary_keys: vec![
                PrimaryKeyPattern::Exact("id".to_string()),
                PrimaryKeyPattern::Exact("_id".to_string()),
                PrimaryKeyPattern::Exact("uuid".to_string()),
                PrimaryKeyPattern::Exact("key".to_string()),
                PrimaryKeyPattern::SingleUnderscoreId,
            ],
            plural_rules: vec![
                PluralRule::KeepIfEndsWith("s".to_string()),
                PluralRule::ReplaceSuffix {
                    from: "y".to_string(),
                    to: "ies".to_string(),
                },
                PluralRule::Append("s".to_string()),
            ],
        }
    }
}

impl InferenceRules {
    pub fn is_container_key(&self, key: &str) -> bool {
        self.container_keys.iter().any(|k| k == key)
    }

    pub fn is_metadata_key(&self, key: &str) -> bool {
        self.metadata_keys.iter().any(|k| k == key)
    }

    pub fn is_version_marker(&self, segment: &str) -> bool {
        self.version_markers.iter().any(|p| p.matches(segment))
    }

    /// Priority of a primary-key candidate (lower wins), `None` if the name
    /// is not a candidate at all
    pub fn primary_key_rank(&self, column: &str) -> Option<usize> {
        self.primary_keys.iter().position(|p| p.matches(column))
    }

    /// Pluralize a lowercase word with the first matching rule
    pub fn pluralize(&self, word: &str) -> String {
        self.plural_rules
            .iter()
            .find_map(|rule| rule.apply(word))
            .unwrap_or_else(|| word.to_string())
    }

    /// Strip one trailing noise word (plus any `-`/`_` left before it)
    ///
    /// The name is kept as-is when stripping would leave nothing.
    pub fn strip_suffix<'a>(&self, name: &'a str) -> &'a str {
        for suffix in &self.strip_suffixes {
            if let Some(stem) = name.strip_suffix(suffix.as_str()) {
                let stem = stem.trim_end_matches(['-', '_']);
                if !stem.is_empty() {
                    return stem;
                }
            }
        }
        name
    }
}
