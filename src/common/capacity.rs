//! Summation of consumed capacity across responses.
//!
//! Numeric fields missing on one side count as zero during the sum only: a field
//! absent on both sides stays absent. Sub-trees (`table` and the secondary index
//! maps) appear in the result once either side carries them.

use aws_sdk_dynamodb::types;
use std::collections;

fn sum(prev: Option<f64>, next: Option<f64>) -> Option<f64> {
    match (prev, next) {
        (None, None) => None,
        (prev, next) => Some(prev.unwrap_or(0.0) + next.unwrap_or(0.0)),
    }
}

fn merge_units(prev: Option<&types::Capacity>, next: &types::Capacity) -> types::Capacity {
    let (capacity_units, read_capacity_units, write_capacity_units) = match prev {
        Some(prev) => (
            prev.capacity_units,
            prev.read_capacity_units,
            prev.write_capacity_units,
        ),
        None => (None, None, None),
    };
    types::Capacity::builder()
        .set_capacity_units(sum(capacity_units, next.capacity_units))
        .set_read_capacity_units(sum(read_capacity_units, next.read_capacity_units))
        .set_write_capacity_units(sum(write_capacity_units, next.write_capacity_units))
        .build()
}

fn merge_table(
    prev: Option<types::Capacity>,
    next: Option<types::Capacity>,
) -> Option<types::Capacity> {
    match (prev, next) {
        (prev, Some(next)) => Some(merge_units(prev.as_ref(), &next)),
        (prev, None) => prev,
    }
}

fn merge_indexes(
    prev: Option<collections::HashMap<String, types::Capacity>>,
    next: Option<collections::HashMap<String, types::Capacity>>,
) -> Option<collections::HashMap<String, types::Capacity>> {
    match (prev, next) {
        (Some(mut indexes), Some(next)) => {
            for (index_name, capacity) in next {
                let merged = merge_units(indexes.get(&index_name), &capacity);
                indexes.insert(index_name, merged);
            }
            Some(indexes)
        }
        (prev, None) => prev,
        (None, next) => next,
    }
}

/// Add `next` into the accumulated capacity `prev`.
///
/// The table name is taken from `next`.
pub fn merge(
    prev: Option<types::ConsumedCapacity>,
    next: types::ConsumedCapacity,
) -> types::ConsumedCapacity {
    let prev = prev.unwrap_or_else(|| types::ConsumedCapacity::builder().build());
    types::ConsumedCapacity::builder()
        .set_table_name(next.table_name)
        .set_capacity_units(sum(prev.capacity_units, next.capacity_units))
        .set_read_capacity_units(sum(prev.read_capacity_units, next.read_capacity_units))
        .set_write_capacity_units(sum(prev.write_capacity_units, next.write_capacity_units))
        .set_table(merge_table(prev.table, next.table))
        .set_local_secondary_indexes(merge_indexes(
            prev.local_secondary_indexes,
            next.local_secondary_indexes,
        ))
        .set_global_secondary_indexes(merge_indexes(
            prev.global_secondary_indexes,
            next.global_secondary_indexes,
        ))
        .build()
}
