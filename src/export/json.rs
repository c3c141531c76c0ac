//! Specification document exporter
//!
//! Serializes a schema snapshot into the document shape consumed by code
//! generators: `{"database": {"tables": [{"name", "id", "fields": [...]}]}}`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::export::sql::SQLExporter;
use crate::export::{ExportError, ExportResult};
use crate::models::{SchemaSnapshot, Table};

/// Top-level specification document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationDocument {
    pub database: DatabaseSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    pub tables: Vec<TableSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub id: Uuid,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// SQLite type name
    #[serde(rename = "type")]
    pub field_type: String,
    /// Constraint clause text, empty when unconstrained
    pub constraints: String,
}

impl From<&Table> for TableSpec {
    fn from(table: &Table) -> Self {
        Self {
            name: table.name.clone(),
            id: table.id,
            fields: table
                .columns
                .iter()
                .map(|column| FieldSpec {
                    name: column.name.clone(),
                    field_type: column.inferred_type.sql_name().to_string(),
                    constraints: SQLExporter::column_constraints(column),
                })
                .collect(),
        }
    }
}

impl From<&SchemaSnapshot> for SpecificationDocument {
    fn from(snapshot: &SchemaSnapshot) -> Self {
        Self {
            database: DatabaseSpec {
                tables: snapshot.tables().iter().map(TableSpec::from).collect(),
            },
        }
    }
}

/// Exporter for the specification document
pub struct SpecificationExporter;

impl SpecificationExporter {
    /// Export a snapshot as pretty-printed JSON
    pub fn export(&self, snapshot: &SchemaSnapshot) -> Result<ExportResult, ExportError> {
        let document = SpecificationDocument::from(snapshot);
        let content = serde_json::to_string_pretty(&document)
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        Ok(ExportResult {
            content,
            format: "json".to_string(),
        })
    }
}
