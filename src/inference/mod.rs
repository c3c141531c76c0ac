//! Schema inference from observed API samples
//!
//! This module folds request/response samples into a registry of tables,
//! inferring columns, SQLite storage classes, nullability and primary keys.
//!
//! ## Features
//!
//! - **Envelope unwrapping** - Paginated bodies (`data`, `items`, ...) yield their item list
//! - **Resource naming** - Table names derived from path templates
//! - **Type unification** - Conflicting observations widen to text
//! - **Table merging** - Commutative, associative merge of repeated observations
//! - **Rule tables** - Naming and key heuristics are plain data and can be swapped
//!
//! ## Example
//!
//! ```rust
//! use clone_seed::inference::SchemaInferrer;
//! use clone_seed::models::Sample;
//! use serde_json::json;
//!
//! let mut inferrer = SchemaInferrer::new();
//! inferrer.add_sample(&Sample::ok(
//!     "/api/products",
//!     json!({"data": [{"id": 1, "name": "Widget"}], "total": 1}),
//! ));
//!
//! let snapshot = inferrer.finalize();
//! assert_eq!(snapshot.table_names(), vec!["products"]);
//! ```

mod config;
mod error;
mod inferrer;
mod ingest;
mod log;
mod merge;
mod naming;
mod relationships;
mod rules;
mod unify;

pub use config::{InferenceConfig, InferenceConfigBuilder};
pub use error::InferenceError;
pub use inferrer::{InferenceStats, SchemaInferrer, infer_schema};
pub use ingest::{Candidate, Extraction, IgnoreReason, extract_candidates};
pub use log::{load_samples, samples_from_json_array, samples_from_json_lines};
pub use merge::{merge, merge_all, merge_with_rules};
pub use naming::{collection_name, normalize_resource, resource_name};
pub use relationships::{infer_foreign_keys, insertion_order};
pub use rules::{InferenceRules, PluralRule, PrimaryKeyPattern, SegmentPattern};
pub use unify::{BatchTable, assign_primary_key, table_from_batch};
