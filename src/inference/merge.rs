//! Merging same-named tables
//!
//! Merging forms a commutative, associative reduction over column sets,
//! types and nullability. Column order follows the left operand and then
//! the right; rows are concatenated without deduplication.

use super::rules::InferenceRules;
use super::unify::assign_primary_key;
use crate::models::Table;

/// Merge two observations of the same table using the default rules
pub fn merge(left: &Table, right: &Table) -> Table {
    merge_with_rules(left, right, &InferenceRules::default())
}

/// Merge two observations of the same table
///
/// - Columns are unioned by name; types unify, nullability is OR'd.
/// - A column missing from one non-empty side becomes nullable, since that
///   side's rows carry no value for it. Earlier rows are never backfilled.
/// - The primary key is re-derived from the merged column set.
pub fn merge_with_rules(left: &Table, right: &Table, rules: &InferenceRules) -> Table {
    if right.is_empty() {
        return left.clone();
    }
    if left.is_empty() {
        let mut merged = right.clone();
        merged.name.clone_from(&left.name);
        merged.id = left.id;
        return merged;
    }

    let mut merged = Table::new(left.name.clone());

    for column in &left.columns {
        let mut column = column.clone();
        match right.column(&column.name) {
            Some(other) => column.absorb(other),
            None => column.nullable = true,
        }
        merged.columns.push(column);
    }

    for column in &right.columns {
        if !merged.has_column(&column.name) {
            let mut column = column.clone();
            column.nullable = true;
            merged.columns.push(column);
        }
    }

    merged.rows = left.rows.iter().chain(right.rows.iter()).cloned().collect();

    assign_primary_key(&mut merged, rules);
    merged
}

/// Reduce any number of observations of one table
pub fn merge_all<'a>(
    tables: impl IntoIterator<Item = &'a Table>,
    rules: &InferenceRules,
) -> Option<Table> {
    let mut iter = tables.into_iter();
    let first = iter.next()?.clone();
    Some(iter.fold(first, |acc, t| merge_with_rules(&acc, t, rules)))
}
