use crate::common;

use aws_sdk_dynamodb::types;
use serde_dynamo::{Error, Result};
use std::collections;

/// Write operation parameters resolved from [`WriteArgs`], ready for a request builder.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) condition_expression: Option<String>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    pub(crate) return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) return_values_on_condition_check_failure:
        Option<types::ReturnValuesOnConditionCheckFailure>,
    pub(crate) table_name: String,
}

impl WriteInput {
    /// Merge an expression's placeholders into this write operation and return its text.
    ///
    /// Fails when a placeholder is already bound to another name or value.
    pub(crate) fn merge_expression(&mut self, expression: common::Expression) -> Result<String> {
        expression.merge_into(
            &mut self.expression_attribute_names,
            &mut self.expression_attribute_values,
        )
    }
}

/// Arguments common to all write operations (Put, Update, Delete).
///
/// ```rust
/// use aws_sdk_dynamodb::types;
/// use dynamodb_wrap::{common, write};
///
/// let write_args = write::common::WriteArgs {
///     condition: Some(common::Expression::equals("status", "pending").unwrap()),
///     return_values: Some(types::ReturnValue::AllOld),
///     table_name: "flights".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs {
    /// Condition that must hold for the write to succeed.
    ///
    /// If the condition is false, the operation fails with a conditional check error.
    pub condition: Option<common::Expression>,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Whether to return item collection metrics.
    pub return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
    /// Which item attributes to return in the response.
    ///
    /// Options: `AllOld`, `AllNew`, `UpdatedOld`, `UpdatedNew`, or `None`.
    pub return_values: Option<types::ReturnValue>,
    /// Which item attributes to return if a condition check fails.
    pub return_values_on_condition_check_failure:
        Option<types::ReturnValuesOnConditionCheckFailure>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl WriteArgs {
    /// Use `return_values` unless return values were already chosen.
    pub(crate) fn default_return_values(&mut self, return_values: types::ReturnValue) {
        self.return_values.get_or_insert(return_values);
    }
}

impl TryFrom<WriteArgs> for WriteInput {
    type Error = Error;

    fn try_from(write_args: WriteArgs) -> Result<Self> {
        let mut operation = Self {
            return_consumed_capacity: write_args.return_consumed_capacity,
            return_item_collection_metrics: write_args.return_item_collection_metrics,
            return_values: write_args.return_values,
            return_values_on_condition_check_failure: write_args
                .return_values_on_condition_check_failure,
            table_name: write_args.table_name,
            ..Default::default()
        };
        if let Some(condition) = write_args.condition {
            operation.condition_expression = Some(operation.merge_expression(condition)?);
        }
        Ok(operation)
    }
}

/// apply common write operation settings to a builder
#[macro_export]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_condition_expression($write_operation.condition_expression)
            .set_expression_attribute_names($write_operation.expression_attribute_names)
            .set_expression_attribute_values($write_operation.expression_attribute_values)
            .set_return_consumed_capacity($write_operation.return_consumed_capacity)
            .set_return_item_collection_metrics($write_operation.return_item_collection_metrics)
            .set_return_values($write_operation.return_values)
            .set_return_values_on_condition_check_failure(
                $write_operation.return_values_on_condition_check_failure,
            )
            .table_name($write_operation.table_name)
    };
}
