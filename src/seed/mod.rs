//! Seed materialization
//!
//! Turns a finalized [`SchemaSnapshot`](crate::models::SchemaSnapshot) into a
//! populated SQLite database (WAL journal, foreign keys on) and a canonical,
//! CHECK-free schema text.
//!
//! ## Example
//!
//! ```rust,no_run
//! use clone_seed::inference::SchemaInferrer;
//! use clone_seed::seed::{MaterializeConfig, SeedMaterializer};
//!
//! let snapshot = SchemaInferrer::new().finalize();
//! let report = SeedMaterializer::new(MaterializeConfig::new("data"))
//!     .materialize(&snapshot)
//!     .unwrap();
//! println!("{} rows inserted, {} skipped", report.rows_inserted, report.rows_skipped);
//! ```

mod config;
mod error;
mod lint;
mod materializer;
mod report;
mod sanitize;
mod store;

pub use config::{MaterializeConfig, MaterializeConfigBuilder};
pub use error::SeedError;
pub use lint::lint_schema;
pub use materializer::{SeedMaterializer, materialize, populate, render_schema};
pub use report::{MaterializeReport, TableLoadStats};
pub use sanitize::{contains_check_clause, sanitize_schema};
pub use store::{InsertOutcome, SeedStore, to_sql_value};
