//! Sample ingestion: turning one response body into table candidates

use serde_json::{Map, Value};

use super::config::InferenceConfig;
use super::naming::{collection_name, resource_name};
use crate::models::Sample;

/// A batch of records destined for one table
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub items: Vec<Map<String, Value>>,
}

/// Why a sample contributed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Status outside 200..=299
    Status,
    /// Absent, blank or non-JSON body
    NoJson,
    /// JSON body that is neither a mapping nor a sequence
    Scalar,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::Status => write!(f, "non-success status"),
            IgnoreReason::NoJson => write!(f, "no JSON body"),
            IgnoreReason::Scalar => write!(f, "scalar body"),
        }
    }
}

/// Outcome of ingesting one sample
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Ignored(IgnoreReason),
    Candidates(Vec<Candidate>),
}

/// Split a sample's body into zero or more table candidates
///
/// Non-mapping elements of a sequence are not records and are dropped here.
pub fn extract_candidates(sample: &Sample, config: &InferenceConfig) -> Extraction {
    if !sample.is_success() {
        return Extraction::Ignored(IgnoreReason::Status);
    }
    let Some(body) = sample.json_body() else {
        return Extraction::Ignored(IgnoreReason::NoJson);
    };

    let path_name = || {
        resource_name(&sample.endpoint.path_template, &config.rules)
            .unwrap_or_else(|| config.default_resource.clone())
    };

    match body {
        Value::Array(items) => Extraction::Candidates(vec![Candidate {
            name: path_name(),
            items: records(items),
        }]),
        Value::Object(map) => Extraction::Candidates(from_mapping(map, path_name, config)),
        _ => Extraction::Ignored(IgnoreReason::Scalar),
    }
}

fn from_mapping(
    mut map: Map<String, Value>,
    path_name: impl Fn() -> String,
    config: &InferenceConfig,
) -> Vec<Candidate> {
    let rules = &config.rules;

    let paginated = map
        .keys()
        .any(|k| rules.is_container_key(k) || rules.is_metadata_key(k));

    if paginated {
        let list_key = rules
            .container_keys
            .iter()
            .find(|k| matches!(map.get(k.as_str()), Some(Value::Array(_))))
            .cloned();
        if let Some(key) = list_key
            && let Some(Value::Array(items)) = map.remove(&key)
        {
            return vec![Candidate {
                name: path_name(),
                items: records(items),
            }];
        }
        // An envelope wrapping a single record
        let single_key = rules
            .container_keys
            .iter()
            .find(|k| matches!(map.get(k.as_str()), Some(Value::Object(_))))
            .cloned();
        if let Some(key) = single_key
            && let Some(Value::Object(record)) = map.remove(&key)
        {
            return vec![Candidate {
                name: path_name(),
                items: vec![record],
            }];
        }
        return Vec::new();
    }

    // Only a mapping made entirely of sequences (or nulls) is a set of collections;
    // any other field makes it one record
    let holds_collections = map
        .values()
        .any(|v| matches!(v, Value::Array(items) if items.iter().any(Value::is_object)))
        && map
            .values()
            .all(|v| matches!(v, Value::Array(_) | Value::Null));

    if !holds_collections {
        return vec![Candidate {
            name: path_name(),
            items: vec![map],
        }];
    }

    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Array(items) if !items.is_empty() => Some(Candidate {
                name: collection_name(&key)?,
                items: records(items),
            }),
            _ => None,
        })
        .collect()
}

fn records(items: Vec<Value>) -> Vec<Map<String, Value>> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Endpoint;
    use serde_json::json;

    fn extract(path: &str, body: Value) -> Vec<Candidate> {
        match extract_candidates(&Sample::ok(path, body), &InferenceConfig::default()) {
            Extraction::Candidates(candidates) => candidates,
            Extraction::Ignored(reason) => panic!("Expected candidates, ignored: {}", reason),
        }
    }

    #[test]
    fn test_sequence_body() {
        let candidates = extract("/api/products", json!([{"id": 1}, {"id": 2}, 3]));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "products");
        assert_eq!(candidates[0].items.len(), 2);
    }

    #[test]
    fn test_pagination_unwrapped() {
        let candidates = extract(
            "/api/products",
            json!({"data": [{"id": 1, "name": "Widget"}], "total": 1}),
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "products");
        assert_eq!(candidates[0].items.len(), 1);
        assert!(!candidates[0].items[0].contains_key("total"));
    }

    #[test]
    fn test_first_container_key_wins() {
        let candidates = extract(
            "/api/products",
            json!({"results": [{"id": 2}], "data": [{"id": 1}]}),
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].items[0]["id"], json!(1));
    }

    #[test]
    fn test_metadata_only_envelope() {
        let candidates = extract("/api/products", json!({"total": 0, "page": 1}));
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_envelope_around_single_record() {
        let candidates = extract("/api/me", json!({"data": {"id": 7, "name": "Ada"}}));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "mes");
        assert_eq!(candidates[0].items[0]["id"], json!(7));
    }

    #[test]
    fn test_single_object_wrapped() {
        let candidates = extract(
            "/api/category",
            json!({"id": 1, "name": "Electronics", "tags": ["a", "b"]}),
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "categories");
        assert_eq!(candidates[0].items.len(), 1);
    }

    #[test]
    fn test_multi_collection() {
        let candidates = extract(
            "/api/home",
            json!({
                "featured": [{"id": 1}],
                "recent": [{"id": 2}, {"id": 3}],
                "empty": [],
                "banner": null
            }),
        );
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["featured", "recent"]);
        assert_eq!(candidates[1].items.len(), 2);
    }

    #[test]
    fn test_detail_with_nested_list_is_one_row() {
        let candidates = extract(
            "/api/orders/{id}",
            json!({"id": 1, "customer": "Ada", "lines": [{"sku": "a", "qty": 2}]}),
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "orders");
        assert_eq!(candidates[0].items.len(), 1);
        assert_eq!(candidates[0].items[0]["customer"], json!("Ada"));
    }

    #[test]
    fn test_scalar_field_keeps_collections_together() {
        let candidates = extract(
            "/api/home",
            json!({"featured": [{"id": 1}], "recent": [{"id": 2}], "title": "Home"}),
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "homes");
    }

    #[test]
    fn test_ignored_samples() {
        let config = InferenceConfig::default();

        let not_found = Sample::new(Endpoint::get("/api/x"), 404, Some(json!({"id": 1})));
        assert_eq!(
            extract_candidates(&not_found, &config),
            Extraction::Ignored(IgnoreReason::Status)
        );

        let html = Sample::new(Endpoint::get("/api/x"), 200, Some(json!("<html>")));
        assert_eq!(
            extract_candidates(&html, &config),
            Extraction::Ignored(IgnoreReason::NoJson)
        );

        let number = Sample::ok("/api/x", json!(42));
        assert_eq!(
            extract_candidates(&number, &config),
            Extraction::Ignored(IgnoreReason::Scalar)
        );
    }

    #[test]
    fn test_default_resource_fallback() {
        let candidates = extract("/api/v1", json!([{"id": 1}]));
        assert_eq!(candidates[0].name, "records");
    }
}
