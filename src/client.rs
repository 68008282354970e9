//! High-level facade over the DynamoDB client.
//!
//! [`Client`] sends the request builders of [`crate::read`] and [`crate::write`],
//! then unwraps the responses into the caller's types. Multiple-item reads follow
//! every continuation key unless told otherwise (see [`read::common::ReadOptions`]).
//! [`Table`] does the same for a single table, filling in its name on every request
//! that has none.
//!
//! ```rust,no_run
//! use dynamodb_wrap::builders::{Action, put, update_expression};
//! use dynamodb_wrap::{client, common, read, write};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Flight {
//!     id: i64,
//!     destination: String,
//! }
//!
//! # async fn example(sdk: aws_sdk_dynamodb::Client) -> Result<(), Box<dyn std::error::Error>> {
//! let flights = client::Client::new(sdk).for_table("flights");
//!
//! let flight: Option<Flight> = flights
//!     .get(read::get_item::GetItem {
//!         keys: common::key::Keys::id(42),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let updated: Option<Flight> = flights
//!     .update(write::update_item::UpdateItem {
//!         keys: common::key::Keys::id(42),
//!         payload: write::update_item::UpdatePayload::builder(update_expression(
//!             Action::Set,
//!             put("destination", "Lisbon"),
//!         )),
//!         write_args: Default::default(),
//!     })
//!     .await?;
//!
//! let all: Vec<Flight> = flights
//!     .get_all::<i64, Flight>(Default::default(), Default::default())
//!     .await?
//!     .into_items()
//!     .unwrap_or_default();
//! # Ok(())
//! # }
//! ```

use crate::{common, common::TableName, read, write};

use aws_sdk_dynamodb::operation;
use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_dynamo::from_item;

fn unwrap_item<D: DeserializeOwned>(
    item: Option<common::Item>,
) -> serde_dynamo::Result<Option<D>> {
    item.map(from_item).transpose()
}

/// DynamoDB client returning unwrapped items.
#[derive(Clone, Debug)]
pub struct Client {
    client: aws_sdk_dynamodb::Client,
}

impl From<aws_sdk_dynamodb::Client> for Client {
    fn from(client: aws_sdk_dynamodb::Client) -> Self {
        Self::new(client)
    }
}

impl Client {
    /// Wrap an SDK client.
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }

    /// The wrapped SDK client.
    pub fn inner(&self) -> &aws_sdk_dynamodb::Client {
        &self.client
    }

    /// A facade scoped to `table_name`.
    pub fn for_table(&self, table_name: impl Into<String>) -> Table {
        Table {
            client: self.clone(),
            table_name: table_name.into(),
        }
    }

    /// Get one item, `None` if there is no item with that key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.get", skip_all, err)
    )]
    pub async fn get<T, D>(
        &self,
        get_item: read::get_item::GetItem<T>,
    ) -> common::error::Result<Option<D>, operation::get_item::GetItemError>
    where
        T: Serialize,
        D: DeserializeOwned,
    {
        let output = get_item.send(&self.client).await?;
        Ok(unwrap_item(output.item)?)
    }

    /// Put one item.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.insert", skip_all, err)
    )]
    pub async fn insert<T: Serialize>(
        &self,
        put_item: write::put_item::PutItem<T>,
    ) -> common::error::Result<operation::put_item::PutItemOutput, operation::put_item::PutItemError>
    {
        Ok(put_item.send(&self.client).await?)
    }

    /// Delete one item and return it as it was.
    ///
    /// Asks for `ALL_OLD` return values unless the request sets its own.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.remove", skip_all, err)
    )]
    pub async fn remove<T, D>(
        &self,
        delete_item: write::delete_item::DeleteItem<T>,
    ) -> common::error::Result<Option<D>, operation::delete_item::DeleteItemError>
    where
        T: Serialize,
        D: DeserializeOwned,
    {
        let output = delete_item.returning_removed().send(&self.client).await?;
        Ok(unwrap_item(output.attributes)?)
    }

    /// Update one item and return it as it is now.
    ///
    /// Asks for `ALL_NEW` return values unless the request sets its own.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.update", skip_all, err)
    )]
    pub async fn update<T, D>(
        &self,
        update_item: write::update_item::UpdateItem<T>,
    ) -> common::error::Result<Option<D>, operation::update_item::UpdateItemError>
    where
        T: Serialize,
        D: DeserializeOwned,
    {
        let output = update_item.returning_updated().send(&self.client).await?;
        Ok(unwrap_item(output.attributes)?)
    }

    /// Scan the table.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.get_all", skip_all, err)
    )]
    pub async fn get_all<T, D>(
        &self,
        scan: read::scan::Scan<T>,
        options: read::common::ReadOptionsOverrides,
    ) -> common::error::Result<read::common::ReadOutput<D>, operation::scan::ScanError>
    where
        T: Serialize,
        D: DeserializeOwned,
    {
        let options = read::common::ReadOptions::default().merge(options);
        let output = if options.autopagination {
            let aggregate = scan.send(&self.client).await?;
            read::common::ReadOutput::from_aggregate(aggregate, options.raw)?
        } else {
            let page = scan.send_page(&self.client).await?;
            read::common::ReadOutput::from_page(page, options.raw)?
        };
        Ok(output)
    }

    /// Query the table.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.query", skip_all, err)
    )]
    pub async fn query<T, D>(
        &self,
        query: read::query::Query<T>,
        options: read::common::ReadOptionsOverrides,
    ) -> common::error::Result<read::common::ReadOutput<D>, operation::query::QueryError>
    where
        T: Serialize,
        D: DeserializeOwned,
    {
        let options = read::common::ReadOptions::default().merge(options);
        let output = if options.autopagination {
            let aggregate = query.send(&self.client).await?;
            read::common::ReadOutput::from_aggregate(aggregate, options.raw)?
        } else {
            let page = query.send_page(&self.client).await?;
            read::common::ReadOutput::from_page(page, options.raw)?
        };
        Ok(output)
    }

    /// Count the items matched by a scan, across every page.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.count", skip_all, err)
    )]
    pub async fn count<T: Serialize>(
        &self,
        scan: read::scan::Scan<T>,
    ) -> common::error::Result<i32, operation::scan::ScanError> {
        Ok(scan.count(&self.client).await?)
    }

    /// Get items from one or more tables in a single call.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.batch_get", skip_all, err)
    )]
    pub async fn batch_get<T: Serialize>(
        &self,
        batch_get_item: read::batch_get_item::BatchGetItem<T>,
    ) -> common::error::Result<
        operation::batch_get_item::BatchGetItemOutput,
        operation::batch_get_item::BatchGetItemError,
    > {
        Ok(batch_get_item.send(&self.client).await?)
    }

    /// Put and delete items in one or more tables in a single call.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.batch_write", skip_all, err)
    )]
    pub async fn batch_write<T: Serialize>(
        &self,
        batch_write_item: write::batch_write_item::BatchWriteItem<T>,
    ) -> common::error::Result<
        operation::batch_write_item::BatchWriteItemOutput,
        operation::batch_write_item::BatchWriteItemError,
    > {
        Ok(batch_write_item.send(&self.client).await?)
    }

    /// Describe a table.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.describe_table", skip(self), err)
    )]
    pub async fn describe_table(
        &self,
        table_name: &str,
    ) -> common::error::Result<
        operation::describe_table::DescribeTableOutput,
        operation::describe_table::DescribeTableError,
    > {
        let output = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await?;
        Ok(output)
    }
}

/// [`Client`] scoped to one table.
///
/// Requests with an empty table name are sent to this table; an explicit
/// table name is left untouched.
#[derive(Clone, Debug)]
pub struct Table {
    client: Client,
    table_name: String,
}

impl Table {
    /// The table this facade is scoped to.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn scoped<R: TableName>(&self, request: R) -> R {
        request.with_default_table_name(&self.table_name)
    }

    /// See [`Client::get`].
    pub async fn get<T, D>(
        &self,
        get_item: read::get_item::GetItem<T>,
    ) -> common::error::Result<Option<D>, operation::get_item::GetItemError>
    where
        T: Serialize,
        D: DeserializeOwned,
    {
        self.client.get(self.scoped(get_item)).await
    }

    /// See [`Client::insert`].
    pub async fn insert<T: Serialize>(
        &self,
        put_item: write::put_item::PutItem<T>,
    ) -> common::error::Result<operation::put_item::PutItemOutput, operation::put_item::PutItemError>
    {
        self.client.insert(self.scoped(put_item)).await
    }

    /// See [`Client::remove`].
    pub async fn remove<T, D>(
        &self,
        delete_item: write::delete_item::DeleteItem<T>,
    ) -> common::error::Result<Option<D>, operation::delete_item::DeleteItemError>
    where
        T: Serialize,
        D: DeserializeOwned,
    {
        self.client.remove(self.scoped(delete_item)).await
    }

    /// See [`Client::update`].
    pub async fn update<T, D>(
        &self,
        update_item: write::update_item::UpdateItem<T>,
    ) -> common::error::Result<Option<D>, operation::update_item::UpdateItemError>
    where
        T: Serialize,
        D: DeserializeOwned,
    {
        self.client.update(self.scoped(update_item)).await
    }

    /// See [`Client::get_all`].
    pub async fn get_all<T, D>(
        &self,
        scan: read::scan::Scan<T>,
        options: read::common::ReadOptionsOverrides,
    ) -> common::error::Result<read::common::ReadOutput<D>, operation::scan::ScanError>
    where
        T: Serialize,
        D: DeserializeOwned,
    {
        self.client.get_all(self.scoped(scan), options).await
    }

    /// See [`Client::query`].
    pub async fn query<T, D>(
        &self,
        query: read::query::Query<T>,
        options: read::common::ReadOptionsOverrides,
    ) -> common::error::Result<read::common::ReadOutput<D>, operation::query::QueryError>
    where
        T: Serialize,
        D: DeserializeOwned,
    {
        self.client.query(self.scoped(query), options).await
    }

    /// See [`Client::count`].
    pub async fn count<T: Serialize>(
        &self,
        scan: read::scan::Scan<T>,
    ) -> common::error::Result<i32, operation::scan::ScanError> {
        self.client.count(self.scoped(scan)).await
    }

    /// Get items of this table by primary key.
    pub async fn batch_get<T: Serialize>(
        &self,
        request: read::batch_get_item::BatchGetRequest<T>,
    ) -> common::error::Result<
        operation::batch_get_item::BatchGetItemOutput,
        operation::batch_get_item::BatchGetItemError,
    > {
        self.client.batch_get(self.batch_get_item(request)).await
    }

    /// Put `items` and delete the items keyed by `keys`, in a single call.
    ///
    /// Puts are listed before deletes.
    pub async fn batch_write<T: Serialize>(
        &self,
        items: Vec<T>,
        keys: Vec<common::key::Keys<T>>,
    ) -> common::error::Result<
        operation::batch_write_item::BatchWriteItemOutput,
        operation::batch_write_item::BatchWriteItemError,
    > {
        self.client
            .batch_write(self.batch_write_item(items, keys))
            .await
    }

    /// Put `items` in a single call.
    pub async fn batch_insert<T: Serialize>(
        &self,
        items: Vec<T>,
    ) -> common::error::Result<
        operation::batch_write_item::BatchWriteItemOutput,
        operation::batch_write_item::BatchWriteItemError,
    > {
        self.batch_write(items, Vec::new()).await
    }

    /// Delete the items keyed by `keys` in a single call.
    pub async fn batch_remove<T: Serialize>(
        &self,
        keys: Vec<common::key::Keys<T>>,
    ) -> common::error::Result<
        operation::batch_write_item::BatchWriteItemOutput,
        operation::batch_write_item::BatchWriteItemError,
    > {
        self.batch_write(Vec::new(), keys).await
    }

    /// Describe this table.
    pub async fn describe(
        &self,
    ) -> common::error::Result<
        operation::describe_table::DescribeTableOutput,
        operation::describe_table::DescribeTableError,
    > {
        self.client.describe_table(&self.table_name).await
    }

    fn batch_get_item<T>(
        &self,
        request: read::batch_get_item::BatchGetRequest<T>,
    ) -> read::batch_get_item::BatchGetItem<T> {
        read::batch_get_item::BatchGetItem {
            items: IndexMap::from([(self.table_name.clone(), request)]),
            return_consumed_capacity: None,
        }
    }

    fn batch_write_item<T>(
        &self,
        items: Vec<T>,
        keys: Vec<common::key::Keys<T>>,
    ) -> write::batch_write_item::BatchWriteItem<T> {
        let requests = items
            .into_iter()
            .map(write::batch_write_item::BatchWriteItemRequest::put)
            .chain(
                keys.into_iter()
                    .map(write::batch_write_item::BatchWriteItemRequest::delete),
            )
            .collect();
        write::batch_write_item::BatchWriteItem {
            request_items: [(self.table_name.clone(), requests)].into(),
            return_consumed_capacity: None,
            return_item_collection_metrics: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::{config, types};
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::collections;

    fn table() -> Table {
        let config = config::Config::builder()
            .behavior_version(config::BehaviorVersion::latest())
            .region(config::Region::new("eu-west-1"))
            .build();
        Client::new(aws_sdk_dynamodb::Client::from_conf(config)).for_table("flights")
    }

    #[rstest]
    #[case::empty("", "flights")]
    #[case::explicit("archive", "archive")]
    fn test_table_scopes_requests(#[case] table_name: &str, #[case] expected: &str) {
        let scan: read::scan::Scan<Value> = read::scan::Scan {
            multiple_read_args: read::common::MultipleReadArgs {
                table_name: table_name.to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let scan = table().scoped(scan);
        assert_eq!(scan.multiple_read_args.table_name, expected);
    }

    #[test]
    fn test_table_scopes_writes() {
        let delete_item = table().scoped(write::delete_item::DeleteItem {
            keys: common::key::Keys::id(json!(1)),
            ..Default::default()
        });
        assert_eq!(delete_item.write_args.table_name, "flights");
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    struct FlightNumber(&'static str);

    #[test]
    fn test_batch_get_item_scoped_to_table() {
        let request = read::batch_get_item::BatchGetRequest {
            consistent_read: None,
            keys: vec![common::key::Keys::id(FlightNumber("TP1234"))],
            projection: None,
        };
        let batch_get_item = table().batch_get_item(request.clone());
        assert_eq!(
            batch_get_item.items,
            IndexMap::from([("flights".to_string(), request)])
        );
        assert_eq!(batch_get_item.return_consumed_capacity, None);
    }

    #[test]
    fn test_batch_write_item_puts_before_deletes() {
        let batch_write_item =
            table().batch_write_item(vec![json!({"id": 1})], vec![common::key::Keys::id(json!(2))]);
        assert_eq!(
            batch_write_item.request_items,
            collections::HashMap::from([(
                "flights".to_string(),
                vec![
                    write::batch_write_item::BatchWriteItemRequest::put(json!({"id": 1})),
                    write::batch_write_item::BatchWriteItemRequest::delete(
                        common::key::Keys::id(json!(2))
                    ),
                ]
            )])
        );
    }

    #[rstest]
    #[case::absent(None, None)]
    #[case::present(
        Some(
            common::Item::from(
                [(
                    "id".to_string(),
                    types::AttributeValue::N(
                        "1".to_string()
                    )
                )]
            )
        ),
        Some(
            json!(
                {
                    "id": 1
                }
            )
        )
    )]
    fn test_unwrap_item(#[case] item: Option<common::Item>, #[case] expected: Option<Value>) {
        assert_eq!(unwrap_item::<Value>(item).unwrap(), expected);
    }
}
