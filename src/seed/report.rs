//! Materialization report

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-table load counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableLoadStats {
    pub table: String,
    pub rows_inserted: usize,
    pub rows_skipped: usize,
}

/// Outcome of one materialization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializeReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub database_path: PathBuf,
    pub schema_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
    pub tables_created: usize,
    pub rows_inserted: usize,
    pub rows_skipped: usize,
    /// Tables in insertion order
    pub tables: Vec<TableLoadStats>,
    /// Hex SHA-256 of the schema text as written
    pub schema_sha256: String,
}

impl MaterializeReport {
    /// Stats for one table, if it was part of the run
    pub fn table(&self, name: &str) -> Option<&TableLoadStats> {
        self.tables.iter().find(|t| t.table == name)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
