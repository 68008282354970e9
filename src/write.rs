//! Requests that change items.
//!
//! Every request here shares [`common::WriteArgs`]: the target table, an optional
//! condition [`crate::common::Expression`] and the `Return*` settings. The condition's
//! placeholders are merged with those of the update expression before sending.

/// Puts and deletes across several tables in one call.
pub mod batch_write_item;

/// Arguments shared by the single-item writes.
pub mod common;

/// Remove one item by key.
pub mod delete_item;

/// Create or replace one item.
pub mod put_item;

/// Change attributes of one item from a partial value or a builder.
pub mod update_item;
