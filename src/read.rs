//! Requests that fetch items.
//!
//! Single-item reads ([`get_item`], [`batch_get_item`]) issue one call. Query and Scan
//! follow `LastEvaluatedKey` through the [`paginator`] and fold every [`page`] into
//! one result, or stop after a single page when asked to.

/// Fetch items by key from several tables.
pub mod batch_get_item;

/// Arguments and output shared by the reads.
pub mod common;

/// Fetch one item by key.
pub mod get_item;

/// One page of a paginated read, and the running total across pages.
pub mod page;

/// Sequential pagination over continuation keys.
pub mod paginator;

/// Items sharing a partition key, optionally narrowed by sort key.
pub mod query;

/// Every item of a table or index.
pub mod scan;
