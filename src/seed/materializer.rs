//! Seed materializer: snapshot in, database file and schema text out

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use super::config::MaterializeConfig;
use super::error::SeedError;
use super::lint::lint_schema;
use super::report::{MaterializeReport, TableLoadStats};
use super::sanitize::sanitize_schema;
use super::store::SeedStore;
use crate::export::json::SpecificationDocument;
use crate::export::sql::SQLExporter;
use crate::inference::insertion_order;
use crate::models::{SchemaSnapshot, Table};

/// Writes a schema snapshot to disk as a populated SQLite database plus the
/// canonical schema text
pub struct SeedMaterializer {
    config: MaterializeConfig,
}

impl SeedMaterializer {
    pub fn new(config: MaterializeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MaterializeConfig {
        &self.config
    }

    /// Run one materialization
    ///
    /// Every table definition is applied before any row is inserted. Row
    /// conflicts are skipped and counted; directory, file and store failures
    /// abort the run.
    pub fn materialize(&self, snapshot: &SchemaSnapshot) -> Result<MaterializeReport, SeedError> {
        let run_id = Uuid::new_v4();
        let _span = info_span!("materialize", run_id = %run_id).entered();
        let started_at = Utc::now();

        let database_path = self.config.database_path();
        let schema_path = self.config.schema_path();
        let snapshot_path = self.config.snapshot_path();

        info!(
            tables = snapshot.len(),
            database = %database_path.display(),
            "Starting materialization"
        );

        fs::create_dir_all(&self.config.output_dir).map_err(|source| SeedError::CreateDir {
            path: self.config.output_dir.clone(),
            source,
        })?;

        if self.config.overwrite {
            remove_store_files(&database_path)?;
        }

        let schema_text = render_schema(snapshot);
        write_file(&schema_path, &schema_text)?;

        let mut store = SeedStore::open(&database_path)?;
        let tables = populate(&mut store, snapshot, &schema_text)?;

        if let Some(path) = &snapshot_path {
            let document = serde_json::to_string_pretty(&SpecificationDocument::from(snapshot))?;
            write_file(path, &document)?;
        }

        store.close()?;

        let rows_inserted: usize = tables.iter().map(|t| t.rows_inserted).sum();
        let rows_skipped: usize = tables.iter().map(|t| t.rows_skipped).sum();
        info!(
            tables = snapshot.len(),
            rows_inserted,
            rows_skipped,
            "Materialization completed"
        );

        Ok(MaterializeReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            database_path,
            schema_path,
            snapshot_path,
            tables_created: snapshot.len(),
            rows_inserted,
            rows_skipped,
            tables,
            schema_sha256: format!("{:x}", Sha256::digest(schema_text.as_bytes())),
        })
    }
}

/// Materialize with the given configuration in one call
pub fn materialize(
    snapshot: &SchemaSnapshot,
    config: MaterializeConfig,
) -> Result<MaterializeReport, SeedError> {
    SeedMaterializer::new(config).materialize(snapshot)
}

/// Canonical, sanitized schema text for a snapshot
///
/// The same snapshot always renders to the same bytes. The text is linted
/// with a SQL parser; a lint failure is only logged since SQLite has the
/// final say when the text is applied.
pub fn render_schema(snapshot: &SchemaSnapshot) -> String {
    let text = sanitize_schema(&SQLExporter::export_schema(snapshot));

    match lint_schema(&text) {
        Ok(count) if count == snapshot.len() => {
            debug!(statements = count, "Schema text lint passed");
        }
        Ok(count) => {
            warn!(
                expected = snapshot.len(),
                found = count,
                "Schema text table count mismatch"
            );
        }
        Err(error) => warn!(%error, "Schema text lint failed"),
    }

    text
}

/// Apply the schema text, then insert every table's rows
///
/// With foreign keys present, referenced tables are loaded first; a
/// reference cycle falls back to snapshot order.
pub fn populate(
    store: &mut SeedStore,
    snapshot: &SchemaSnapshot,
    schema_text: &str,
) -> Result<Vec<TableLoadStats>, SeedError> {
    store.apply_schema(schema_text)?;

    let ordered: Vec<&Table> = load_order(snapshot);

    let mut stats = Vec::with_capacity(ordered.len());
    for table in ordered {
        let outcome = store.insert_rows(table)?;
        debug!(
            table = %table.name,
            inserted = outcome.inserted,
            skipped = outcome.skipped,
            "Loaded table"
        );
        stats.push(TableLoadStats {
            table: table.name.clone(),
            rows_inserted: outcome.inserted,
            rows_skipped: outcome.skipped,
        });
    }
    Ok(stats)
}

fn load_order(snapshot: &SchemaSnapshot) -> Vec<&Table> {
    let tables = snapshot.tables();
    if !snapshot.has_foreign_keys() {
        return tables.iter().collect();
    }
    match insertion_order(tables) {
        Some(order) => order.into_iter().map(|idx| &tables[idx]).collect(),
        None => {
            warn!("Foreign key cycle detected, inserting in snapshot order");
            tables.iter().collect()
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), SeedError> {
    fs::write(path, content).map_err(|source| SeedError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Remove a database file and its WAL/shared-memory siblings
fn remove_store_files(database_path: &Path) -> Result<(), SeedError> {
    let mut paths = vec![database_path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut sibling = database_path.as_os_str().to_owned();
        sibling.push(suffix);
        paths.push(PathBuf::from(sibling));
    }

    for path in paths {
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "Removed existing store file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(SeedError::RemoveFile { path, source }),
        }
    }
    Ok(())
}
