//! Observed request/response samples

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The endpoint a sample was observed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub path_template: String,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Endpoint {
    pub fn new(path_template: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path_template: path_template.into(),
            method: method.into(),
        }
    }

    pub fn get(path_template: impl Into<String>) -> Self {
        Self::new(path_template, "GET")
    }
}

/// One observation produced by the endpoint prober
///
/// `body` holds the decoded JSON value, or the raw response text as a JSON
/// string when the prober could not decode it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub endpoint: Endpoint,
    pub status: u16,
    #[serde(default)]
    pub body: Option<Value>,
}

impl Sample {
    pub fn new(endpoint: Endpoint, status: u16, body: Option<Value>) -> Self {
        Self {
            endpoint,
            status,
            body,
        }
    }

    /// A successful GET sample with a JSON body
    pub fn ok(path_template: impl Into<String>, body: Value) -> Self {
        Self::new(Endpoint::get(path_template), 200, Some(body))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as JSON, if there is one
    ///
    /// Raw text bodies are decoded again; text that is not JSON, blank text
    /// and an absent body all yield `None`.
    pub fn json_body(&self) -> Option<Value> {
        match self.body.as_ref()? {
            Value::Null => None,
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::String(_)) | Err(_) => None,
                    Ok(value) => Some(value),
                }
            }
            other => Some(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_range() {
        let mut sample = Sample::ok("/api/products", json!([]));
        assert!(sample.is_success());
        sample.status = 204;
        assert!(sample.is_success());
        sample.status = 404;
        assert!(!sample.is_success());
        sample.status = 301;
        assert!(!sample.is_success());
    }

    #[test]
    fn test_raw_text_body_reparsed() {
        let sample = Sample::new(
            Endpoint::get("/api/products"),
            200,
            Some(json!(r#"[{"id": 1}]"#)),
        );
        assert_eq!(sample.json_body(), Some(json!([{"id": 1}])));
    }

    #[test]
    fn test_non_json_bodies() {
        let html = Sample::new(Endpoint::get("/"), 200, Some(json!("<html></html>")));
        assert_eq!(html.json_body(), None);

        let blank = Sample::new(Endpoint::get("/"), 200, Some(json!("   ")));
        assert_eq!(blank.json_body(), None);

        let absent = Sample::new(Endpoint::get("/"), 200, None);
        assert_eq!(absent.json_body(), None);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let sample: Sample = serde_json::from_str(
            r#"{"endpoint": {"pathTemplate": "/api/users/{id}"}, "status": 200, "body": {"id": 1}}"#,
        )
        .unwrap();
        assert_eq!(sample.endpoint.path_template, "/api/users/{id}");
        assert_eq!(sample.endpoint.method, "GET");
        assert_eq!(sample.body, Some(json!({"id": 1})));
    }
}
