//! Naming-heuristic foreign keys and parent-first ordering
//!
//! A non-key column `<word>_id` references the table named by the plural of
//! `<word>` when that table exists and has a primary key. Nothing here runs
//! unless foreign key inference is switched on.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::rules::{InferenceRules, PrimaryKeyPattern};
use crate::models::{ForeignKey, Table};

/// Attach foreign keys to `<word>_id` columns that name another table
///
/// Returns the number of references added. Self-references are not created.
pub fn infer_foreign_keys(tables: &mut [Table], rules: &InferenceRules) -> usize {
    let targets: HashMap<String, String> = tables
        .iter()
        .filter_map(|t| t.primary_key().map(|pk| (t.name.clone(), pk.name.clone())))
        .collect();

    let mut added = 0;
    for table in tables.iter_mut() {
        for column in table.columns.iter_mut() {
            if column.is_primary_key
                || column.foreign_key.is_some()
                || !PrimaryKeyPattern::SingleUnderscoreId.matches(&column.name)
            {
                continue;
            }
            let Some(word) = column.name.strip_suffix("_id") else {
                continue;
            };
            let target = rules.pluralize(&word.to_lowercase());
            if target == table.name {
                continue;
            }
            if let Some(pk) = targets.get(&target) {
                column.foreign_key = Some(ForeignKey {
                    table: target,
                    column: pk.clone(),
                });
                added += 1;
            }
        }
    }
    added
}

/// Order table indices so referenced tables come before referencing ones
///
/// Returns `None` when the references form a cycle.
pub fn insertion_order(tables: &[Table]) -> Option<Vec<usize>> {
    let mut graph = DiGraph::<usize, ()>::new();
    let nodes: HashMap<&str, NodeIndex> = tables
        .iter()
        .enumerate()
        .map(|(idx, t)| (t.name.as_str(), graph.add_node(idx)))
        .collect();

    for table in tables {
        let child = nodes[table.name.as_str()];
        for fk in table.columns.iter().filter_map(|c| c.foreign_key.as_ref()) {
            if let Some(&parent) = nodes.get(fk.table.as_str())
                && parent != child
            {
                graph.update_edge(parent, child, ());
            }
        }
    }

    toposort(&graph, None)
        .ok()
        .map(|sorted| sorted.into_iter().map(|node| graph[node]).collect())
}
