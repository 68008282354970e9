use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use indexmap::IndexMap;
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// Keys to fetch from one table, with their read settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetRequest<T> {
    /// Whether to use a consistent read.
    pub consistent_read: Option<bool>,
    /// The primary keys of the items to retrieve.
    pub keys: Vec<common::key::Keys<T>>,
    /// Which attributes to retrieve. See [`common::Expression::projection`].
    pub projection: Option<common::Expression>,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct BatchGetRequestInput {
    keys: Vec<common::Item>,
    single_read_operation: read::common::SingleReadInput,
}

/// batch get item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct BatchGetItemInput {
    request_items: Vec<BatchGetRequestInput>,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
}

/// Batch get item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_wrap::{common, read};
/// use indexmap::IndexMap;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let batch_get = read::batch_get_item::BatchGetItem {
///     items: IndexMap::from([(
///         "flights".to_string(),
///         read::batch_get_item::BatchGetRequest {
///             keys: vec![common::key::Keys::id(42), common::key::Keys::id(33)],
///             ..Default::default()
///         },
///     )]),
///     ..Default::default()
/// };
/// batch_get.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItem<T> {
    /// The keys to retrieve, by table name.
    pub items: IndexMap<String, BatchGetRequest<T>>,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
}

impl<T: Serialize> TryFrom<BatchGetItem<T>> for BatchGetItemInput {
    type Error = Error;

    fn try_from(batch_get_item: BatchGetItem<T>) -> Result<Self> {
        let mut request_items = Vec::with_capacity(batch_get_item.items.len());
        for (table_name, request) in batch_get_item.items {
            let single_read_args = read::common::SingleReadArgs {
                consistent_read: request.consistent_read,
                projection: request.projection,
                table_name,
            };
            let mut keys = Vec::with_capacity(request.keys.len());
            for key in request.keys {
                let key: common::Item = key.try_into()?;
                keys.push(key);
            }
            request_items.push(BatchGetRequestInput {
                keys,
                single_read_operation: single_read_args.try_into()?,
            });
        }
        let operation = Self {
            request_items,
            return_consumed_capacity: batch_get_item.return_consumed_capacity,
        };
        Ok(operation)
    }
}

impl<T: Serialize> BatchGetItem<T> {
    /// Execute the batch get item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.batch_get_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::batch_get_item::BatchGetItemOutput,
        error::SdkError<operation::batch_get_item::BatchGetItemError>,
    > {
        let batch_get_item: BatchGetItemInput =
            self.try_into().map_err(error::BuildError::other)?;
        let mut request_items =
            collections::HashMap::with_capacity(batch_get_item.request_items.len());
        for request in batch_get_item.request_items {
            let single_read_operation = request.single_read_operation;
            let keys_and_attributes = types::KeysAndAttributes::builder()
                .set_consistent_read(single_read_operation.consistent_read)
                .set_expression_attribute_names(single_read_operation.expression_attribute_names)
                .set_keys(Some(request.keys))
                .set_projection_expression(single_read_operation.projection_expression)
                .build()?;
            request_items.insert(single_read_operation.table_name, keys_and_attributes);
        }
        client
            .batch_get_item()
            .set_request_items(Some(request_items))
            .set_return_consumed_capacity(batch_get_item.return_consumed_capacity)
            .send()
            .await
    }
}
