//! Field and type unification within one batch of records

use serde_json::{Map, Value};

use super::rules::InferenceRules;
use crate::models::{Column, ColumnType, Row, Table};

/// Result of folding a batch into a fresh table
#[derive(Debug, Clone)]
pub struct BatchTable {
    pub table: Table,
    /// Keys of unsampled items that matched no sampled column
    pub fields_dropped: usize,
}

/// Build a table from one batch of records
///
/// Only the first `sample_size` items shape the columns. Every item becomes
/// a row; rows of unsampled items are projected onto the sampled columns.
pub fn table_from_batch(
    name: &str,
    items: Vec<Map<String, Value>>,
    sample_size: usize,
    rules: &InferenceRules,
) -> BatchTable {
    let mut table = Table::new(name);
    let sampled = items.len().min(sample_size);

    // sampled items giving each column a non-null value, parallel to `table.columns`
    let mut present: Vec<usize> = Vec::new();

    for item in &items[..sampled] {
        // keys differing only in ASCII case land in one column, counted once per item
        let mut filled: Vec<usize> = Vec::new();
        for (key, value) in item {
            let observed = ColumnType::of_value(value);
            let idx = match table.column_index(key) {
                Some(idx) => {
                    let column = &mut table.columns[idx];
                    column.inferred_type = column.inferred_type.unify(observed);
                    idx
                }
                None => {
                    table.columns.push(Column::new(key.clone(), observed));
                    present.push(0);
                    table.columns.len() - 1
                }
            };
            if !value.is_null() && !filled.contains(&idx) {
                filled.push(idx);
                present[idx] += 1;
            }
        }
    }

    for (column, seen) in table.columns.iter_mut().zip(&present) {
        column.nullable = *seen < sampled;
    }

    let mut fields_dropped = 0;
    let rows: Vec<Row> = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            if idx < sampled {
                return item;
            }
            let mut row = Row::new();
            for (key, value) in item {
                if table.has_column(&key) {
                    row.insert(key, value);
                } else {
                    fields_dropped += 1;
                }
            }
            row
        })
        .collect();
    table.rows = rows;

    assign_primary_key(&mut table, rules);

    BatchTable {
        table,
        fields_dropped,
    }
}

/// Designate at most one primary key
///
/// The candidate matching the highest-priority rule wins; ties go to the
/// lexicographically smallest name so the choice is independent of column
/// order.
pub fn assign_primary_key(table: &mut Table, rules: &InferenceRules) {
    let winner = table
        .columns
        .iter()
        .filter_map(|c| rules.primary_key_rank(&c.name).map(|rank| (rank, c.name.clone())))
        .min();

    for column in &mut table.columns {
        let primary = winner.as_ref().is_some_and(|(_, name)| *name == column.name);
        column.set_primary_key(primary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(values: Value) -> Vec<Map<String, Value>> {
        match values {
            Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    Value::Object(map) => map,
                    other => panic!("Expected object, got {}", other),
                })
                .collect(),
            other => panic!("Expected array, got {}", other),
        }
    }

    fn batch(values: Value, sample_size: usize) -> BatchTable {
        table_from_batch("things", items(values), sample_size, &InferenceRules::default())
    }

    #[test]
    fn test_column_order_is_first_seen() {
        let result = batch(json!([{"b": 1, "a": 2}, {"c": 3, "a": 4}]), 10);
        assert_eq!(result.table.column_names(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_null_then_typed_is_nullable() {
        let result = batch(json!([{"price": null}, {"price": 9.5}]), 10);
        let price = result.table.column("price").unwrap();
        assert_eq!(price.inferred_type, ColumnType::Real);
        assert!(price.nullable);
    }

    #[test]
    fn test_absent_key_is_nullable() {
        let result = batch(json!([{"id": 1, "note": "x"}, {"id": 2}]), 10);
        assert!(result.table.column("note").unwrap().nullable);
        assert!(!result.table.column("id").unwrap().nullable);
    }

    #[test]
    fn test_conflicting_types_widen() {
        let result = batch(json!([{"v": 1}, {"v": "one"}]), 10);
        assert_eq!(result.table.column("v").unwrap().inferred_type, ColumnType::Text);
    }

    #[test]
    fn test_sample_size_limits_inference() {
        let result = batch(
            json!([{"id": 1}, {"id": 2}, {"id": 3, "extra": true}]),
            2,
        );
        assert_eq!(result.table.column_names(), vec!["id"]);
        assert_eq!(result.table.rows.len(), 3);
        assert!(!result.table.rows[2].contains_key("extra"));
        assert_eq!(result.fields_dropped, 1);
    }

    #[test]
    fn test_case_variant_keys_share_column() {
        let result = batch(
            json!([{"id": 1, "URL": "a", "url": "b"}, {"id": 2, "url": "c"}]),
            10,
        );
        assert_eq!(result.table.column_names(), vec!["id", "URL"]);
        let url = result.table.column("url").unwrap();
        assert_eq!(url.inferred_type, ColumnType::Text);
        assert!(!url.nullable);
    }

    #[test]
    fn test_case_variant_counted_once_per_item() {
        let result = batch(json!([{"Tag": "x", "tag": "y"}, {"id": 2}]), 10);
        assert!(result.table.column("tag").unwrap().nullable);
    }

    #[test]
    fn test_unsampled_case_variant_kept_in_row() {
        let result = batch(json!([{"Name": "a"}, {"name": "b", "other": 1}]), 1);
        assert_eq!(result.table.column_names(), vec!["Name"]);
        assert_eq!(result.table.rows[1]["name"], json!("b"));
        assert_eq!(result.fields_dropped, 1);
    }

    #[test]
    fn test_primary_key_detection() {
        let result = batch(json!([{"name": "a", "id": 1}]), 10);
        let id = result.table.primary_key().unwrap();
        assert_eq!(id.name, "id");
        assert!(id.is_auto_increment);
    }

    #[test]
    fn test_primary_key_priority_over_order() {
        let result = batch(json!([{"user_id": 3, "uuid": "abc", "_id": "x"}]), 10);
        let pk = result.table.primary_key().unwrap();
        assert_eq!(pk.name, "_id");
        assert!(!pk.is_auto_increment);
        assert_eq!(result.table.columns.iter().filter(|c| c.is_primary_key).count(), 1);
    }

    #[test]
    fn test_underscore_id_tie_breaks_by_name() {
        let result = batch(json!([{"user_id": 3, "product_id": 4}]), 10);
        assert_eq!(result.table.primary_key().unwrap().name, "product_id");
    }

    #[test]
    fn test_no_candidate_no_key() {
        let result = batch(json!([{"name": "a", "order_item_id": 4}]), 10);
        assert!(result.table.primary_key().is_none());
    }
}
