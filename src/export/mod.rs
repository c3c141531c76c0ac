//! Export functionality
//!
//! Provides exporters for a schema snapshot:
//! - SQL (SQLite table definitions)
//! - Specification JSON document for code generators

pub mod json;
pub mod sql;

/// Result of an export operation
#[derive(Debug)]
pub struct ExportResult {
    /// Exported content
    pub content: String,
    /// Format identifier
    pub format: String,
}

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// Re-export for convenience
pub use json::{SpecificationDocument, SpecificationExporter};
pub use sql::SQLExporter;
