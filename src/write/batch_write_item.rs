use crate::common;

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result, to_item};
use std::collections;

/// A put item request within a batch write operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItemRequestPutItem<T> {
    /// The item to put into the table.
    pub item: T,
}

/// A delete item request within a batch write operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItemRequestDeleteItem<T> {
    /// The primary key of the item to delete.
    pub keys: common::key::Keys<T>,
}

/// A single request within a batch write operation.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchWriteItemRequest<T> {
    /// Put item request - creates or replaces an item.
    PutItem(BatchWriteItemRequestPutItem<T>),
    /// Delete item request - removes an item by its primary key.
    DeleteItem(BatchWriteItemRequestDeleteItem<T>),
}

impl<T> BatchWriteItemRequest<T> {
    /// A request putting `item`.
    pub fn put(item: T) -> Self {
        Self::PutItem(BatchWriteItemRequestPutItem { item })
    }

    /// A request deleting the item with primary key `keys`.
    pub fn delete(keys: common::key::Keys<T>) -> Self {
        Self::DeleteItem(BatchWriteItemRequestDeleteItem { keys })
    }
}

#[derive(Clone, Debug, PartialEq)]
enum WriteRequestInput {
    Put(common::Item),
    Delete(common::Item),
}

impl<T: Serialize> TryFrom<BatchWriteItemRequest<T>> for WriteRequestInput {
    type Error = Error;

    fn try_from(write_request: BatchWriteItemRequest<T>) -> Result<Self> {
        let request = match write_request {
            BatchWriteItemRequest::PutItem(put_item) => Self::Put(to_item(put_item.item)?),
            BatchWriteItemRequest::DeleteItem(delete_item) => {
                Self::Delete(delete_item.keys.try_into()?)
            }
        };
        Ok(request)
    }
}

impl TryFrom<WriteRequestInput> for types::WriteRequest {
    type Error = error::BuildError;

    fn try_from(write_request: WriteRequestInput) -> std::result::Result<Self, Self::Error> {
        let builder = match write_request {
            WriteRequestInput::Put(item) => {
                let put_request = types::PutRequest::builder().set_item(Some(item)).build()?;
                Self::builder().put_request(put_request)
            }
            WriteRequestInput::Delete(keys) => {
                let delete_request = types::DeleteRequest::builder().set_key(Some(keys)).build()?;
                Self::builder().delete_request(delete_request)
            }
        };
        Ok(builder.build())
    }
}

/// batch write item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct BatchWriteItemInput {
    request_items: collections::HashMap<String, Vec<WriteRequestInput>>,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
}

/// Batch write item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_wrap::{common, write};
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let batch_write = write::batch_write_item::BatchWriteItem {
///     request_items: HashMap::from([(
///         "flights".to_string(),
///         vec![
///             write::batch_write_item::BatchWriteItemRequest::put(json!({"id": 1, "destination": "Lisbon"})),
///             write::batch_write_item::BatchWriteItemRequest::delete(common::key::Keys::id(json!(2))),
///         ],
///     )]),
///     ..Default::default()
/// };
/// batch_write.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItem<T> {
    /// A map of table names to lists of write requests.
    pub request_items: collections::HashMap<String, Vec<BatchWriteItemRequest<T>>>,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Whether to return item collection metrics.
    pub return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
}

impl<T: Serialize> TryFrom<BatchWriteItem<T>> for BatchWriteItemInput {
    type Error = Error;

    fn try_from(batch_write_item: BatchWriteItem<T>) -> Result<Self> {
        let mut request_items =
            collections::HashMap::with_capacity(batch_write_item.request_items.len());
        for (table_name, table_request_items) in batch_write_item.request_items {
            let mut serialized_table_request_items = Vec::with_capacity(table_request_items.len());
            for request_item in table_request_items {
                let request_item: WriteRequestInput = request_item.try_into()?;
                serialized_table_request_items.push(request_item);
            }
            request_items.insert(table_name, serialized_table_request_items);
        }
        let operation = Self {
            request_items,
            return_consumed_capacity: batch_write_item.return_consumed_capacity,
            return_item_collection_metrics: batch_write_item.return_item_collection_metrics,
        };
        Ok(operation)
    }
}

impl<T: Serialize> BatchWriteItem<T> {
    /// Execute the batch write item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.batch_write_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::batch_write_item::BatchWriteItemOutput,
        error::SdkError<operation::batch_write_item::BatchWriteItemError>,
    > {
        let batch_write_item: BatchWriteItemInput =
            self.try_into().map_err(error::BuildError::other)?;
        let mut request_items =
            collections::HashMap::with_capacity(batch_write_item.request_items.len());
        for (table_name, table_request_items) in batch_write_item.request_items {
            let mut write_requests = Vec::with_capacity(table_request_items.len());
            for request_item in table_request_items {
                let write_request: types::WriteRequest = request_item.try_into()?;
                write_requests.push(write_request);
            }
            request_items.insert(table_name, write_requests);
        }
        client
            .batch_write_item()
            .set_request_items(Some(request_items))
            .set_return_consumed_capacity(batch_write_item.return_consumed_capacity)
            .set_return_item_collection_metrics(batch_write_item.return_item_collection_metrics)
            .send()
            .await
    }
}
