use crate::{builders, builders::BuilderExt, common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use indexmap::IndexMap;
use serde::Serialize;
use serde_dynamo::{Error, Result, to_item};
use std::fmt;

/// What an update changes.
///
/// ```rust
/// use dynamodb_wrap::builders::{Action, put, update_expression};
/// use dynamodb_wrap::write::update_item::UpdatePayload;
/// use serde_json::json;
///
/// // `SET #set0 = :set0, #set1 = :set1`
/// let partial = UpdatePayload::Partial(json!({"destination": "Lisbon", "seats": 3}));
/// let built: UpdatePayload<()> = UpdatePayload::builder(update_expression(Action::Set, put("seats", 3)));
/// ```
pub enum UpdatePayload<T> {
    /// Assign every attribute of the value in one `SET` block.
    Partial(T),
    /// Build the update expression with [`crate::builders`].
    Builder(builders::Builder),
}

impl<T> UpdatePayload<T> {
    /// Wrap a builder.
    pub fn builder<F>(builder: F) -> Self
    where
        F: FnOnce(common::Expression) -> Result<common::Expression> + Send + 'static,
    {
        Self::Builder(builder.boxed())
    }
}

impl<T: fmt::Debug> fmt::Debug for UpdatePayload<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Partial(partial) => f.debug_tuple("Partial").field(partial).finish(),
            Self::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

impl<T: Serialize> TryFrom<UpdatePayload<T>> for common::Expression {
    type Error = Error;

    fn try_from(payload: UpdatePayload<T>) -> Result<Self> {
        match payload {
            UpdatePayload::Partial(partial) => {
                let item: common::Item = to_item(partial)?;
                let mut item: IndexMap<_, _> = item.into_iter().collect();
                item.sort_keys();
                let assignments = move |mut expression: Self| -> Result<Self> {
                    for (index, (name, value)) in item.into_iter().enumerate() {
                        expression
                            .expression
                            .push_str(&format!("#set{index} = :set{index}, "));
                        expression
                            .expression_attribute_names
                            .insert(format!("#set{index}"), name);
                        expression
                            .expression_attribute_values
                            .insert(format!(":set{index}"), value);
                    }
                    Ok(expression)
                };
                builders::update_expression(builders::Action::Set, assignments).build()
            }
            UpdatePayload::Builder(builder) => builder.build(),
        }
    }
}

/// update item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct UpdateItemInput {
    keys: common::Item,
    update_expression: String,
    write_operation: write::common::WriteInput,
}

/// Update item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_wrap::builders::{Action, BuilderExt, append, put, update_expression};
/// use dynamodb_wrap::{common, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let update_item: write::update_item::UpdateItem<i64> = write::update_item::UpdateItem {
///     keys: common::key::Keys::id(42),
///     payload: write::update_item::UpdatePayload::builder(update_expression(
///         Action::Set,
///         put("gate", "B12").then(append("passengers", vec!["Ada"])),
///     )),
///     write_args: write::common::WriteArgs {
///         table_name: "flights".to_string(),
///         ..Default::default()
///     },
/// };
/// update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UpdateItem<T> {
    /// The primary key of the item to update.
    pub keys: common::key::Keys<T>,
    /// The changes to make.
    pub payload: UpdatePayload<T>,
    /// Additional write operation arguments (table name, condition, return values, etc.).
    pub write_args: write::common::WriteArgs,
}

impl<T> UpdateItem<T> {
    /// Return the updated item (`ALL_NEW`) unless return values were chosen.
    pub(crate) fn returning_updated(mut self) -> Self {
        self.write_args
            .default_return_values(types::ReturnValue::AllNew);
        self
    }
}

impl<T> common::TableName for UpdateItem<T> {
    fn table_name_mut(&mut self) -> &mut String {
        &mut self.write_args.table_name
    }
}

impl<T: Serialize> TryFrom<UpdateItem<T>> for UpdateItemInput {
    type Error = Error;

    fn try_from(update_item: UpdateItem<T>) -> Result<Self> {
        let keys = update_item.keys.try_into()?;
        let expression = update_item.payload.try_into()?;
        let mut write_operation: write::common::WriteInput = update_item.write_args.try_into()?;
        let update_expression = write_operation.merge_expression(expression)?;
        let operation = Self {
            keys,
            update_expression,
            write_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize> UpdateItem<T> {
    /// Execute the update item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.update_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::update_item::UpdateItemOutput,
        error::SdkError<operation::update_item::UpdateItemError>,
    > {
        let update_item: UpdateItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client
            .update_item()
            .set_key(Some(update_item.keys))
            .update_expression(update_item.update_expression);
        crate::apply_write_operation!(builder, update_item.write_operation)
            .send()
            .await
    }
}
