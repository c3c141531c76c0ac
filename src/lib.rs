//! Clone Seed - schema inference and seed materialization for observed APIs
//!
//! Provides:
//! - Sample ingestion and resource naming
//! - Table inference (columns, SQLite types, nullability, primary keys)
//! - Commutative merging of repeated observations
//! - SQLite table definition and specification document export
//! - Seed database materialization with CHECK-free schema text
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod config;
pub mod export;
pub mod inference;
pub mod models;
pub mod seed;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use export::{ExportError, ExportResult, SQLExporter, SpecificationDocument, SpecificationExporter};
pub use inference::{
    InferenceConfig, InferenceError, InferenceRules, InferenceStats, SchemaInferrer, infer_schema,
};
pub use models::{Column, ColumnType, Endpoint, ForeignKey, Row, Sample, SchemaSnapshot, Table};
pub use seed::{MaterializeConfig, MaterializeReport, SeedError, SeedMaterializer, SeedStore};
