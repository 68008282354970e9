use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};

/// Removes one item by key.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_wrap::{common, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let cancelled = common::Expression::equals("status", "cancelled")?;
/// let mut delete_item = write::delete_item::DeleteItem::new(common::key::Keys::id(42)).when(cancelled);
/// delete_item.write_args.table_name = "flights".to_string();
/// delete_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteItem<T> {
    /// Primary key of the item to remove.
    pub keys: common::key::Keys<T>,
    /// Table, condition and `Return*` settings.
    pub write_args: write::common::WriteArgs,
}

impl<T> DeleteItem<T> {
    /// Remove the item keyed by `keys`.
    pub fn new(keys: common::key::Keys<T>) -> Self {
        Self {
            keys,
            write_args: write::common::WriteArgs::default(),
        }
    }

    /// Only remove the item while `condition` holds.
    pub fn when(mut self, condition: common::Expression) -> Self {
        self.write_args.condition = Some(condition);
        self
    }

    /// Return the removed attributes (`ALL_OLD`) unless return values were chosen.
    pub(crate) fn returning_removed(mut self) -> Self {
        self.write_args
            .default_return_values(types::ReturnValue::AllOld);
        self
    }
}

impl<T> common::TableName for DeleteItem<T> {
    fn table_name_mut(&mut self) -> &mut String {
        &mut self.write_args.table_name
    }
}

#[derive(Debug, PartialEq)]
struct DeleteItemInput {
    key: common::Item,
    write: write::common::WriteInput,
}

impl<T: Serialize> TryFrom<DeleteItem<T>> for DeleteItemInput {
    type Error = Error;

    fn try_from(delete_item: DeleteItem<T>) -> Result<Self> {
        Ok(Self {
            key: delete_item.keys.try_into()?,
            write: delete_item.write_args.try_into()?,
        })
    }
}

impl<T: Serialize> DeleteItem<T> {
    /// Send the request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.delete_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_item::DeleteItemOutput,
        error::SdkError<operation::delete_item::DeleteItemError>,
    > {
        let input: DeleteItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client.delete_item().set_key(Some(input.key));
        crate::apply_write_operation!(builder, input.write)
            .send()
            .await
    }
}
