//! Error types for seed materialization

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort materialization
///
/// Row-level constraint violations are not errors; they are skipped and
/// counted in the report.
#[derive(Error, Debug)]
pub enum SeedError {
    /// Output directory could not be created
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Schema text or snapshot file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Existing store could not be removed in overwrite mode
    #[error("Failed to remove {}: {source}", path.display())]
    RemoveFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SeedError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            SeedError::CreateDir { path, .. } => {
                format!(
                    "{self}\n\nHint: Check that {} is writable.",
                    path.parent().unwrap_or(path).display()
                )
            }
            SeedError::WriteFile { path, .. } => {
                format!(
                    "{self}\n\nHint: Check free space and permissions for {}.",
                    path.display()
                )
            }
            SeedError::RemoveFile { .. } => {
                format!("{self}\n\nHint: Close any process holding the seed database open.")
            }
            SeedError::Database(msg) if msg.contains("locked") => {
                format!("{self}\n\nHint: Another process is writing to the seed database.")
            }
            _ => self.to_string(),
        }
    }
}

impl From<rusqlite::Error> for SeedError {
    fn from(err: rusqlite::Error) -> Self {
        SeedError::Database(err.to_string())
    }
}
