use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation};
use serde::Serialize;
use serde_dynamo::{Error, Result, to_item};
use std::{collections, fmt};

/// Creates an item, or replaces the item stored under the same key.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_wrap::write;
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let mut put_item = write::put_item::PutItem::new(json!({"id": 42, "destination": "Lisbon"}))
///     .unless_exists("id");
/// put_item.write_args.table_name = "flights".to_string();
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PutItem<T> {
    /// The item, serialized as a map of attributes.
    pub item: T,
    /// Table, condition and `Return*` settings.
    pub write_args: write::common::WriteArgs,
}

impl<T> PutItem<T> {
    /// Put `item`.
    pub fn new(item: T) -> Self {
        Self {
            item,
            write_args: write::common::WriteArgs::default(),
        }
    }

    /// Only write while `condition` holds.
    pub fn when(mut self, condition: common::Expression) -> Self {
        self.write_args.condition = Some(condition);
        self
    }

    /// Only write when no stored item has the attribute `name`, so an existing item is never replaced.
    pub fn unless_exists(self, name: impl fmt::Display) -> Self {
        let name = name.to_string();
        let condition = common::Expression {
            expression: format!("attribute_not_exists(#{name})"),
            expression_attribute_names: collections::HashMap::from([(format!("#{name}"), name)]),
            ..Default::default()
        };
        self.when(condition)
    }
}

impl<T> common::TableName for PutItem<T> {
    fn table_name_mut(&mut self) -> &mut String {
        &mut self.write_args.table_name
    }
}

#[derive(Debug, PartialEq)]
struct PutItemInput {
    item: common::Item,
    write: write::common::WriteInput,
}

impl<T: Serialize> TryFrom<PutItem<T>> for PutItemInput {
    type Error = Error;

    fn try_from(put_item: PutItem<T>) -> Result<Self> {
        Ok(Self {
            item: to_item(put_item.item)?,
            write: put_item.write_args.try_into()?,
        })
    }
}

impl<T: Serialize> PutItem<T> {
    /// Send the request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.put_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let input: PutItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client.put_item().set_item(Some(input.item));
        crate::apply_write_operation!(builder, input.write)
            .send()
            .await
    }
}
