//! Resource naming from request paths

use super::rules::InferenceRules;

/// Derive a table name from an endpoint path
///
/// Returns `None` when no segment survives filtering; the caller substitutes
/// its configured default.
pub fn resource_name(path: &str, rules: &InferenceRules) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let segment = path
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| !rules.is_version_marker(s))
        .filter(|s| !is_path_parameter(s))
        .filter(|s| !s.chars().all(|c| c.is_ascii_digit()))
        .last()?;

    let cleaned: String = segment
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | ':' | '<' | '>') && !c.is_ascii_digit())
        .collect();

    normalize_resource(&cleaned, rules)
}

/// Lowercase, strip a trailing noise word and pluralize
pub fn normalize_resource(raw: &str, rules: &InferenceRules) -> Option<String> {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    let stem = rules.strip_suffix(&lower);
    Some(rules.pluralize(stem))
}

/// Name for a collection found under a key of a response mapping
///
/// The key is used as-is apart from lowercasing.
pub fn collection_name(key: &str) -> Option<String> {
    let name = key.trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

fn is_path_parameter(segment: &str) -> bool {
    segment.starts_with(':')
        || (segment.starts_with('{') && segment.ends_with('}'))
        || (segment.starts_with('<') && segment.ends_with('>'))
}
