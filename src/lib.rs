#![warn(missing_docs)]

//! # DynamoDB Wrap
//!
//! An ergonomic layer over the Amazon DynamoDB client.
//!
//! ## Overview
//!
//! - Request builders for every item operation (Get, Put, Update, Delete, Query, Scan, Batch)
//!   that take plain Rust values and serialize them with `serde_dynamo`
//! - Auto-pagination: scans and queries follow `LastEvaluatedKey` until the read is
//!   drained, folding items, counts and consumed capacity into one result
//! - Composable update expressions with managed `#name` / `:value` placeholders
//! - A [`client::Client`] facade that unwraps items into your own types, and a
//!   [`client::Table`] scoped to one table
//!
//! ## Quick Example
//!
//! ```no_run
//! use aws_sdk_dynamodb::Client;
//! use dynamodb_wrap::builders::{Action, BuilderExt, append, put, remove, update_expression};
//! use dynamodb_wrap::{common, write};
//! use serde_json::Value;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let client = Client::from_conf(aws_sdk_dynamodb::config::Config::builder().build());
//! let update_item: write::update_item::UpdateItem<Value> = write::update_item::UpdateItem {
//!     keys: common::key::Keys::id(Value::String("1".to_string())),
//!     payload: write::update_item::UpdatePayload::builder(
//!         update_expression(
//!             Action::Set,
//!             put("name", "Jane").then(append("tags", vec!["new"])),
//!         )
//!         .then(update_expression(Action::Remove, remove("nickname"))),
//!     ),
//!     write_args: write::common::WriteArgs {
//!         table_name: "users".to_string(),
//!         ..Default::default()
//!     },
//! };
//! // "SET #name = :name, #tags = list_append(#tags, :tags) REMOVE #nickname"
//! update_item.send(&client).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@builders`] - Update expression builders
//! - [`mod@client`] - Facade returning unwrapped items, and its table-scoped variant
//! - [`mod@common`] - Shared utilities for expressions, keys, consumed capacity and errors
//! - [`mod@read`] - Read operations (GetItem, Query, Scan, BatchGetItem) and pagination
//! - [`mod@write`] - Write operations (PutItem, UpdateItem, DeleteItem, BatchWriteItem)

pub mod builders;

pub mod client;

pub mod common;

/// Read operations for retrieving data from DynamoDB tables.
///
/// This module provides operations for:
/// - Getting individual items by key
/// - Querying items with key conditions
/// - Scanning entire tables
/// - Batch retrieving multiple items
pub mod read;

/// Write operations for modifying data in DynamoDB tables.
///
/// This module provides operations for:
/// - Putting new items or replacing existing ones
/// - Updating items with a partial value or composed expressions
/// - Deleting items by key
/// - Batch writing multiple items
pub mod write;
