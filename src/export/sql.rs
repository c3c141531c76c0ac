//! SQL exporter for generating SQLite CREATE TABLE statements from a schema snapshot.
//!
//! # Security
//!
//! All identifiers (table names, column names) are double-quoted and internal
//! quote characters are escaped by doubling them, so field keys taken from
//! API responses cannot break out of the statement.

use crate::export::{ExportError, ExportResult};
use crate::models::{Column, SchemaSnapshot, Table};

/// Exporter for SQLite CREATE TABLE format.
pub struct SQLExporter;

impl SQLExporter {
    /// Export a table to a SQLite CREATE TABLE statement.
    ///
    /// Column clauses follow the table's column order. The statement is
    /// idempotent (`IF NOT EXISTS`) and never carries CHECK constraints.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clone_seed::export::sql::SQLExporter;
    /// use clone_seed::models::{Column, ColumnType, Table};
    ///
    /// let mut id = Column::new("id", ColumnType::Integer);
    /// id.set_primary_key(true);
    /// let table = Table::with_columns("users", vec![id, Column::new("name", ColumnType::Text)]);
    ///
    /// let sql = SQLExporter::export_table(&table);
    /// assert_eq!(
    ///     sql,
    ///     "CREATE TABLE IF NOT EXISTS \"users\" (\n  \"id\" INTEGER PRIMARY KEY AUTOINCREMENT,\n  \"name\" TEXT NOT NULL\n);\n"
    /// );
    /// ```
    pub fn export_table(table: &Table) -> String {
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n",
            Self::quote_identifier(&table.name)
        );

        let column_defs: Vec<String> = table
            .columns
            .iter()
            .map(|column| {
                let mut col_def = format!(
                    "  {} {}",
                    Self::quote_identifier(&column.name),
                    column.inferred_type.sql_name()
                );
                let constraints = Self::column_constraints(column);
                if !constraints.is_empty() {
                    col_def.push(' ');
                    col_def.push_str(&constraints);
                }
                col_def
            })
            .collect();

        sql.push_str(&column_defs.join(",\n"));
        sql.push_str("\n);\n");
        sql
    }

    /// Constraint clause text for a column, empty when it has none
    ///
    /// Primary keys are never marked `NOT NULL`; `AUTOINCREMENT` only
    /// follows an integer primary key.
    pub fn column_constraints(column: &Column) -> String {
        let mut parts: Vec<String> = Vec::new();

        if column.is_primary_key {
            parts.push("PRIMARY KEY".to_string());
            if column.is_auto_increment {
                parts.push("AUTOINCREMENT".to_string());
            }
        } else if !column.nullable {
            parts.push("NOT NULL".to_string());
        }

        if let Some(fk) = &column.foreign_key {
            parts.push(format!(
                "REFERENCES {}({})",
                Self::quote_identifier(&fk.table),
                Self::quote_identifier(&fk.column)
            ));
        }

        parts.join(" ")
    }

    /// Render every table in snapshot order.
    ///
    /// Regenerating from the same snapshot yields byte-identical text.
    pub fn export_schema(snapshot: &SchemaSnapshot) -> String {
        snapshot
            .tables()
            .iter()
            .map(Self::export_table)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Export a snapshot to SQL (SDK interface).
    pub fn export(&self, snapshot: &SchemaSnapshot) -> Result<ExportResult, ExportError> {
        Ok(ExportResult {
            content: Self::export_schema(snapshot),
            format: "sql".to_string(),
        })
    }

    /// Quote and escape an identifier for SQLite.
    ///
    /// # Security
    ///
    /// Internal double quotes are doubled, preventing SQL injection through
    /// table or column names.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clone_seed::export::sql::SQLExporter;
    ///
    /// assert_eq!(SQLExporter::quote_identifier("user-name"), "\"user-name\"");
    /// assert_eq!(SQLExporter::quote_identifier("a\"b"), "\"a\"\"b\"");
    /// ```
    pub fn quote_identifier(identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnType;

    fn products() -> Table {
        let mut id = Column::new("id", ColumnType::Integer);
        id.set_primary_key(true);
        Table::with_columns(
            "products",
            vec![
                id,
                Column::new("name", ColumnType::Text),
                Column::new("price", ColumnType::Real).with_nullable(true),
                Column::new("notes", ColumnType::Null).with_nullable(true),
            ],
        )
    }

    #[test]
    fn test_export_table() {
        let sql = SQLExporter::export_table(&products());
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"products\" (\n  \"id\" INTEGER PRIMARY KEY AUTOINCREMENT,\n  \"name\" TEXT NOT NULL,\n  \"price\" REAL,\n  \"notes\" TEXT\n);\n"
        );
        assert!(!sql.contains("CHECK"));
    }

    #[test]
    fn test_text_primary_key_has_no_autoincrement() {
        let mut uuid = Column::new("uuid", ColumnType::Text);
        uuid.set_primary_key(true);
        assert_eq!(SQLExporter::column_constraints(&uuid), "PRIMARY KEY");
    }

    #[test]
    fn test_nullable_primary_key_not_marked_not_null() {
        let mut id = Column::new("id", ColumnType::Integer).with_nullable(false);
        id.set_primary_key(true);
        let constraints = SQLExporter::column_constraints(&id);
        assert!(!constraints.contains("NOT NULL"));
    }

    #[test]
    fn test_foreign_key_clause() {
        let column =
            Column::new("product_id", ColumnType::Integer).with_foreign_key("products", "id");
        assert_eq!(
            SQLExporter::column_constraints(&column),
            "NOT NULL REFERENCES \"products\"(\"id\")"
        );
    }

    #[test]
    fn test_quoting_escapes_quotes() {
        let table = Table::with_columns(
            "odd\"name",
            vec![Column::new("we\"ird", ColumnType::Text).with_nullable(true)],
        );
        let sql = SQLExporter::export_table(&table);
        assert!(sql.contains("\"odd\"\"name\""));
        assert!(sql.contains("\"we\"\"ird\" TEXT"));
    }

    #[test]
    fn test_export_schema_is_stable() {
        let snapshot = SchemaSnapshot::new(vec![products(), Table::with_columns(
            "users",
            vec![Column::new("email", ColumnType::Text)],
        )]);
        let first = SQLExporter::export_schema(&snapshot);
        let second = SQLExporter.export(&snapshot).unwrap().content;
        assert_eq!(first, second);
        assert_eq!(first.matches("CREATE TABLE IF NOT EXISTS").count(), 2);
    }
}
