//! SQLite seed store

use std::path::{Path, PathBuf};

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, ErrorCode, params_from_iter};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::error::SeedError;
use crate::export::sql::SQLExporter;
use crate::models::Table;

/// Counts from inserting one table's rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    pub inserted: usize,
    pub skipped: usize,
}

/// Seed database with a single exclusive writer
///
/// File-backed stores run in WAL journal mode; every store enforces
/// foreign keys.
pub struct SeedStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SeedStore {
    /// Open or create a seed database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(path = %path.display(), journal_mode = %mode, "Opened seed store");
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn memory() -> Result<Self, SeedError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn, path: None })
    }

    /// Get the database path (if not in-memory)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current journal mode, lowercase as SQLite reports it
    pub fn journal_mode(&self) -> Result<String, SeedError> {
        Ok(self
            .conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))?)
    }

    pub fn foreign_keys_enabled(&self) -> Result<bool, SeedError> {
        let enabled: i64 = self
            .conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))?;
        Ok(enabled == 1)
    }

    /// Execute schema text containing one or more statements
    pub fn apply_schema(&self, sql: &str) -> Result<(), SeedError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Insert a table's rows inside one transaction
    ///
    /// Values are bound per declared column, in column order. Rows that
    /// collide with an existing key, or otherwise violate a constraint, are
    /// skipped and counted. Any other failure aborts.
    pub fn insert_rows(&mut self, table: &Table) -> Result<InsertOutcome, SeedError> {
        let mut outcome = InsertOutcome::default();
        if table.rows.is_empty() || table.columns.is_empty() {
            return Ok(outcome);
        }

        let sql = insert_statement(table);
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for (idx, row) in table.rows.iter().enumerate() {
                let values = table
                    .columns
                    .iter()
                    .map(|c| to_sql_value(c.value_in(row)))
                    .collect::<Result<Vec<_>, _>>()?;

                match stmt.execute(params_from_iter(values.iter())) {
                    Ok(0) => {
                        warn!(table = %table.name, row = idx, reason = "duplicate key or constraint", "Skipped row");
                        outcome.skipped += 1;
                    }
                    Ok(_) => outcome.inserted += 1,
                    Err(rusqlite::Error::SqliteFailure(err, msg))
                        if matches!(
                            err.code,
                            ErrorCode::ConstraintViolation | ErrorCode::TypeMismatch
                        ) =>
                    {
                        let reason = msg.unwrap_or_else(|| err.to_string());
                        warn!(table = %table.name, row = idx, %reason, "Skipped row");
                        outcome.skipped += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
        tx.commit()?;
        Ok(outcome)
    }

    /// User tables in name order
    pub fn table_names(&self) -> Result<Vec<String>, SeedError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    /// Declared column names of a table, in definition order
    pub fn column_names(&self, table: &str) -> Result<Vec<String>, SeedError> {
        let stmt = self.conn.prepare(&format!(
            "SELECT * FROM {} LIMIT 0",
            SQLExporter::quote_identifier(table)
        ))?;
        Ok(stmt.column_names().into_iter().map(String::from).collect())
    }

    pub fn row_count(&self, table: &str) -> Result<i64, SeedError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", SQLExporter::quote_identifier(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Read every row of a table back as JSON objects, in rowid order
    pub fn fetch_rows(&self, table: &str) -> Result<Vec<Map<String, Value>>, SeedError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY rowid",
            SQLExporter::quote_identifier(table)
        ))?;
        let column_names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query([])?;

        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut obj = Map::new();
            for (i, name) in column_names.iter().enumerate() {
                let json_value = match row.get_ref(i)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(n) => Value::Number(n.into()),
                    ValueRef::Real(f) => serde_json::Number::from_f64(f)
                        .map(Value::Number)
                        .unwrap_or(Value::Null),
                    ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
                    ValueRef::Blob(b) => Value::String(format!("<{} bytes>", b.len())),
                };
                obj.insert(name.clone(), json_value);
            }
            results.push(obj);
        }
        Ok(results)
    }

    /// Close the store, surfacing any error from the final flush
    pub fn close(self) -> Result<(), SeedError> {
        self.conn.close().map_err(|(_, e)| e.into())
    }
}

fn insert_statement(table: &Table) -> String {
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| SQLExporter::quote_identifier(&c.name))
        .collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT OR IGNORE INTO {} ({}) VALUES ({})",
        SQLExporter::quote_identifier(&table.name),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Convert one JSON field to a bindable SQLite value
///
/// Missing and null become NULL, booleans 0/1, nested values JSON text.
pub fn to_sql_value(value: Option<&Value>) -> Result<SqlValue, SeedError> {
    Ok(match value {
        None | Some(Value::Null) => SqlValue::Null,
        Some(Value::Bool(b)) => SqlValue::Integer(i64::from(*b)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
        },
        Some(Value::String(s)) => SqlValue::Text(s.clone()),
        Some(nested @ (Value::Array(_) | Value::Object(_))) => {
            SqlValue::Text(serde_json::to_string(nested)?)
        }
    })
}
