//! Models module
//!
//! Defines the data structures shared by inference and materialization:
//! observed samples, inferred columns and tables, and the finalized snapshot.

pub mod column;
pub mod sample;
pub mod snapshot;
pub mod table;

pub use column::{Column, ColumnType, ForeignKey};
pub use sample::{Endpoint, Sample};
pub use snapshot::SchemaSnapshot;
pub use table::{Row, Table};
