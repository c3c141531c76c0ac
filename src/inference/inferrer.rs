//! Schema inference engine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::InferenceConfig;
use super::ingest::{Extraction, extract_candidates};
use super::merge::merge_with_rules;
use super::relationships::infer_foreign_keys;
use super::unify::table_from_batch;
use crate::models::{Sample, SchemaSnapshot, Table};

/// Statistics from schema inference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceStats {
    /// Samples folded, including ignored ones
    pub samples_processed: usize,
    /// Samples that contributed nothing
    pub samples_ignored: usize,
    /// Table candidates extracted from bodies
    pub candidates: usize,
    /// Rows accumulated across all tables
    pub rows_collected: usize,
    /// Keys of unsampled items with no matching column
    pub fields_dropped: usize,
}

/// Schema inference engine
///
/// Folds samples into a table registry. The registry is keyed by table
/// name, so the finalized snapshot lists tables in name order regardless of
/// the order samples arrived in.
pub struct SchemaInferrer {
    config: InferenceConfig,
    registry: BTreeMap<String, Table>,
    stats: InferenceStats,
}

impl Default for SchemaInferrer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaInferrer {
    /// Create a new schema inferrer with default configuration
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    /// Create a new schema inferrer with custom configuration
    pub fn with_config(config: InferenceConfig) -> Self {
        Self {
            config,
            registry: BTreeMap::new(),
            stats: InferenceStats::default(),
        }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Fold one sample into the registry
    ///
    /// Samples that cannot contribute (failed status, no JSON, scalar body)
    /// are counted and otherwise ignored.
    pub fn add_sample(&mut self, sample: &Sample) {
        self.stats.samples_processed += 1;

        let candidates = match extract_candidates(sample, &self.config) {
            Extraction::Ignored(reason) => {
                debug!(
                    status = sample.status,
                    path = %sample.endpoint.path_template,
                    %reason,
                    "Ignoring sample"
                );
                self.stats.samples_ignored += 1;
                return;
            }
            Extraction::Candidates(candidates) => candidates,
        };

        let mut contributed = false;
        for candidate in candidates {
            self.stats.candidates += 1;
            if candidate.items.is_empty() {
                debug!(table = %candidate.name, "Candidate has no records");
                continue;
            }
            debug!(
                table = %candidate.name,
                items = candidate.items.len(),
                "Folding candidate"
            );

            let batch = table_from_batch(
                &candidate.name,
                candidate.items,
                self.config.effective_sample_size(),
                &self.config.rules,
            );
            self.stats.fields_dropped += batch.fields_dropped;
            self.stats.rows_collected += batch.table.rows.len();
            self.fold(batch.table);
            contributed = true;
        }

        if !contributed {
            self.stats.samples_ignored += 1;
        }
    }

    /// Fold a sequence of samples in order
    pub fn add_samples<'a>(&mut self, samples: impl IntoIterator<Item = &'a Sample>) {
        for sample in samples {
            self.add_sample(sample);
        }
    }

    fn fold(&mut self, table: Table) {
        match self.registry.remove(&table.name) {
            Some(existing) => {
                let merged = merge_with_rules(&existing, &table, &self.config.rules);
                self.registry.insert(merged.name.clone(), merged);
            }
            None => {
                self.registry.insert(table.name.clone(), table);
            }
        }
    }

    pub fn stats(&self) -> &InferenceStats {
        &self.stats
    }

    /// Look up a table in the registry
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.registry.get(name)
    }

    pub fn table_count(&self) -> usize {
        self.registry.len()
    }

    /// Snapshot the registry without consuming the inferrer
    pub fn snapshot(&self) -> SchemaSnapshot {
        Self::finish(self.registry.values().cloned().collect(), &self.config)
    }

    /// Consume the inferrer and produce the finalized snapshot
    pub fn finalize(self) -> SchemaSnapshot {
        Self::finish(self.registry.into_values().collect(), &self.config)
    }

    fn finish(tables: Vec<Table>, config: &InferenceConfig) -> SchemaSnapshot {
        // tables whose records were all empty mappings have nothing to declare
        let mut tables: Vec<Table> = tables
            .into_iter()
            .filter(|t| !t.columns.is_empty())
            .collect();

        if config.infer_foreign_keys {
            let added = infer_foreign_keys(&mut tables, &config.rules);
            debug!(references = added, "Inferred foreign keys");
        }

        SchemaSnapshot::new(tables)
    }
}

/// Fold a sample sequence into a snapshot in one call
pub fn infer_schema<'a>(
    samples: impl IntoIterator<Item = &'a Sample>,
    config: InferenceConfig,
) -> SchemaSnapshot {
    let mut inferrer = SchemaInferrer::with_config(config);
    inferrer.add_samples(samples);
    inferrer.finalize()
}
