//! Table model for inferred resources

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::column::Column;

/// One observed record, keyed by field name
pub type Row = Map<String, Value>;

/// An inferred table: ordered columns plus the raw rows collected for it
///
/// Columns keep first-seen order and are unique by name, ignoring ASCII case
/// since SQLite does; the first spelling seen is kept. Rows are stored as
/// observed; keys that only appear in later rows are never backfilled into
/// earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub id: Uuid,
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = Self::generate_id(&name);
        Self {
            id,
            name,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_columns(name: impl Into<String>, columns: Vec<Column>) -> Self {
        let mut table = Self::new(name);
        table.columns = columns;
        table
    }

    /// Generate a deterministic UUID v5 for a table from its name
    ///
    /// The same name always maps to the same id, so exported snapshots are
    /// byte-identical across runs.
    pub fn generate_id(name: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_DNS, format!("table:{}", name).as_bytes())
    }

    /// Position of a column, matching names the way SQLite does (ASCII
    /// case-insensitive)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|idx| &self.columns[idx])
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.column_index(name).map(|idx| &mut self.columns[idx])
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// The primary-key column, if one was designated
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary_key)
    }

    /// A table with no columns and no rows; the identity for merging
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
