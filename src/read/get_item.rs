use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::fmt;

/// Fetches one item by primary key.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_wrap::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let mut get_item = read::get_item::GetItem::new(common::key::Keys::id(42))
///     .project(["destination", "status"])
///     .consistent();
/// get_item.single_read_args.table_name = "flights".to_string();
/// get_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem<T> {
    /// Primary key of the item.
    pub keys: common::key::Keys<T>,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Table, consistency and projection.
    pub single_read_args: read::common::SingleReadArgs,
}

impl<T> GetItem<T> {
    /// Fetch the item keyed by `keys`.
    pub fn new(keys: common::key::Keys<T>) -> Self {
        Self {
            keys,
            return_consumed_capacity: None,
            single_read_args: read::common::SingleReadArgs::default(),
        }
    }

    /// Only return the attributes in `names`.
    pub fn project<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.single_read_args.projection = Some(common::Expression::projection(names));
        self
    }

    /// Use a strongly consistent read.
    pub fn consistent(mut self) -> Self {
        self.single_read_args.consistent_read = Some(true);
        self
    }
}

impl<T> common::TableName for GetItem<T> {
    fn table_name_mut(&mut self) -> &mut String {
        &mut self.single_read_args.table_name
    }
}

#[derive(Clone, Debug, PartialEq)]
struct GetItemInput {
    key: common::Item,
    read: read::common::SingleReadInput,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
}

impl<T: Serialize> TryFrom<GetItem<T>> for GetItemInput {
    type Error = Error;

    fn try_from(get_item: GetItem<T>) -> Result<Self> {
        Ok(Self {
            key: get_item.keys.try_into()?,
            read: get_item.single_read_args.try_into()?,
            return_consumed_capacity: get_item.return_consumed_capacity,
        })
    }
}

impl<T: Serialize> GetItem<T> {
    /// Send the request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.get_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::get_item::GetItemOutput,
        error::SdkError<operation::get_item::GetItemError>,
    > {
        let input: GetItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client
            .get_item()
            .set_key(Some(input.key))
            .set_return_consumed_capacity(input.return_consumed_capacity);
        crate::apply_single_read_operation!(builder, input.read)
            .send()
            .await
    }
}
