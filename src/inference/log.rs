//! Observation log loading

use std::path::Path;

use serde_json::Value;

use super::error::InferenceError;
use crate::models::Sample;

/// Parse a newline-delimited log with one sample per line
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn samples_from_json_lines(text: &str) -> Result<Vec<Sample>, InferenceError> {
    let mut samples = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(line).map_err(|e| InferenceError::InvalidRecord {
                line: idx + 1,
                reason: e.to_string(),
            })?;
        samples.push(sample_from_value(value, idx + 1)?);
    }
    Ok(samples)
}

/// Parse a log holding a JSON array of samples
pub fn samples_from_json_array(text: &str) -> Result<Vec<Sample>, InferenceError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(InferenceError::JsonParse(
            "expected an array of samples".to_string(),
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| sample_from_value(item, idx + 1))
        .collect()
}

/// Read a log file, choosing the format from its first non-blank character
pub fn load_samples(path: &Path) -> Result<Vec<Sample>, InferenceError> {
    let text = std::fs::read_to_string(path)?;
    if text.trim_start().starts_with('[') {
        samples_from_json_array(&text)
    } else {
        samples_from_json_lines(&text)
    }
}

fn sample_from_value(value: Value, line: usize) -> Result<Sample, InferenceError> {
    serde_json::from_value(value).map_err(|e| InferenceError::InvalidRecord {
        line,
        reason: e.to_string(),
    })
}
