use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};

/// query operation
#[derive(Clone, Debug, Default, PartialEq)]
struct QueryInput {
    key_condition_expression: String,
    multiple_read_operation: read::common::MultipleReadInput,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    scan_index_forward: Option<bool>,
}

impl read::paginator::WithExclusiveStartKey for QueryInput {
    fn with_exclusive_start_key(mut self, exclusive_start_key: common::Item) -> Self {
        self.multiple_read_operation = self
            .multiple_read_operation
            .with_exclusive_start_key(exclusive_start_key);
        self
    }
}

impl QueryInput {
    async fn fetch_page(
        self,
        client: &Client,
    ) -> Result<read::page::Page, error::SdkError<operation::query::QueryError>> {
        let builder = client
            .query()
            .key_condition_expression(self.key_condition_expression)
            .set_return_consumed_capacity(self.return_consumed_capacity)
            .set_scan_index_forward(self.scan_index_forward);
        let output = crate::apply_multiple_read_operation!(builder, self.multiple_read_operation)
            .send()
            .await?;
        Ok(output.into())
    }
}

/// Query operation.
///
/// The key condition is the partition key equality, followed by the optional
/// sort key condition.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_wrap::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query = read::query::Query {
///     partition_key: common::key::Key {
///         name: "id".to_string(),
///         value: "1".to_string(),
///     },
///     sort_key_condition: Some(common::Expression {
///         expression: "#departure > :departure".to_string(),
///         expression_attribute_names: [("#departure".to_string(), "departure".to_string())].into(),
///         expression_attribute_values: [(
///             ":departure".to_string(),
///             serde_dynamo::to_attribute_value("2024-01-01")?,
///         )]
///         .into(),
///     }),
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "flights".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// query.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query<T> {
    /// Additional read operation arguments (table name, filter, projection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// The partition key value to query for.
    pub partition_key: common::key::Key<T>,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Whether to scan the index forward (ascending) or backward (descending).
    pub scan_index_forward: Option<bool>,
    /// Optional condition to apply to the sort key.
    pub sort_key_condition: Option<common::Expression>,
}

impl<T> common::TableName for Query<T> {
    fn table_name_mut(&mut self) -> &mut String {
        &mut self.multiple_read_args.table_name
    }
}

impl<T: Serialize> TryFrom<Query<T>> for QueryInput {
    type Error = Error;

    fn try_from(query: Query<T>) -> Result<Self> {
        let mut multiple_read_operation: read::common::MultipleReadInput =
            query.multiple_read_args.try_into()?;
        let mut key_condition =
            common::Expression::equals(query.partition_key.name, query.partition_key.value)?;
        if let Some(sort_key_condition) = query.sort_key_condition {
            key_condition = key_condition.join(" AND ", sort_key_condition)?;
        }
        let key_condition_expression = key_condition.merge_into(
            &mut multiple_read_operation.expression_attribute_names,
            &mut multiple_read_operation.expression_attribute_values,
        )?;
        let operation = Self {
            key_condition_expression,
            multiple_read_operation,
            return_consumed_capacity: query.return_consumed_capacity,
            scan_index_forward: query.scan_index_forward,
        };
        Ok(operation)
    }
}

impl<T: Serialize> Query<T> {
    /// Execute the query operation, reading every page.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.query", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<read::page::AggregateResult, error::SdkError<operation::query::QueryError>> {
        let query: QueryInput = self.try_into().map_err(error::BuildError::other)?;
        read::paginator::paginate(&query, |query| query.fetch_page(client)).await
    }

    /// Execute the query operation, reading the first page only.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.query_page", skip_all, err)
    )]
    pub async fn send_page(
        self,
        client: &Client,
    ) -> Result<read::page::Page, error::SdkError<operation::query::QueryError>> {
        let query: QueryInput = self.try_into().map_err(error::BuildError::other)?;
        query.fetch_page(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::Value;
    use std::collections;

    #[rstest]
    #[case::partition_key_only(
        Query {
            multiple_read_args: read::common::MultipleReadArgs {
                table_name: "a".to_string(),
                ..Default::default()
            },
            partition_key: common::key::Key {
                name: "b".to_string(),
                value: Value::String(
                    "c".to_string()
                ),
            },
            ..Default::default()
        },
        QueryInput {
            key_condition_expression: "#b = :b".to_string(),
            multiple_read_operation: read::common::MultipleReadInput {
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#b".to_string(), "b".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":b".to_string(),
                                types::AttributeValue::S(
                                    "c".to_string()
                                )
                            ),
                        ]
                    )
                ),
                table_name: "a".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    )]
    #[case::full(
        Query {
            multiple_read_args: read::common::MultipleReadArgs {
                consistent_read: Some(false),
                filter: Some(
                    common::Expression::equals(
                        "a",
                        Value::String(
                            "b".to_string()
                        )
                    ).unwrap()
                ),
                index_name: Some("e".to_string()),
                limit: Some(10),
                projection: Some(
                    common::Expression::projection(["f", "g"])
                ),
                table_name: "h".to_string(),
                ..Default::default()
            },
            partition_key: common::key::Key {
                name: "i".to_string(),
                value: Value::String(
                    "j".to_string()
                ),
            },
            return_consumed_capacity: Some(
                types::ReturnConsumedCapacity::Total
            ),
            scan_index_forward: Some(false),
            sort_key_condition: Some(
                common::Expression {
                    expression: "begins_with(#k, :k)".to_string(),
                    expression_attribute_names: collections::HashMap::from(
                        [
                            ("#k".to_string(), "k".to_string()),
                        ]
                    ),
                    expression_attribute_values: collections::HashMap::from(
                        [
                            (
                                ":k".to_string(),
                                types::AttributeValue::S(
                                    "l".to_string()
                                )
                            ),
                        ]
                    ),
                }
            ),
        },
        QueryInput {
            key_condition_expression: "#i = :i AND begins_with(#k, :k)".to_string(),
            multiple_read_operation: read::common::MultipleReadInput {
                consistent_read: Some(false),
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#a".to_string(), "a".to_string()),
                            ("#f".to_string(), "f".to_string()),
                            ("#g".to_string(), "g".to_string()),
                            ("#i".to_string(), "i".to_string()),
                            ("#k".to_string(), "k".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":a".to_string(),
                                types::AttributeValue::S(
                                    "b".to_string()
                                )
                            ),
                            (
                                ":i".to_string(),
                                types::AttributeValue::S(
                                    "j".to_string()
                                )
                            ),
                            (
                                ":k".to_string(),
                                types::AttributeValue::S(
                                    "l".to_string()
                                )
                            ),
                        ]
                    )
                ),
                filter_expression: Some(
                    "#a = :a".to_string()
                ),
                index_name: Some("e".to_string()),
                limit: Some(10),
                projection_expression: Some(
                    "#f, #g".to_string()
                ),
                table_name: "h".to_string(),
                ..Default::default()
            },
            return_consumed_capacity: Some(
                types::ReturnConsumedCapacity::Total
            ),
            scan_index_forward: Some(false),
        }
    )]
    fn test_query(#[case] args: Query<Value>, #[case] expected: QueryInput) {
        let actual: QueryInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::other_flight("TP1235", false)]
    #[case::same_flight("TP1234", true)]
    fn test_query_filter_on_partition_key(#[case] filtered_flight: &str, #[case] accepted: bool) {
        let query = Query {
            multiple_read_args: read::common::MultipleReadArgs {
                filter: Some(common::Expression::equals("flight", filtered_flight).unwrap()),
                table_name: "bookings".to_string(),
                ..Default::default()
            },
            partition_key: common::key::Key {
                name: "flight".to_string(),
                value: Value::String("TP1234".to_string()),
            },
            ..Default::default()
        };
        let actual: Result<QueryInput> = query.try_into();
        assert_eq!(actual.is_ok(), accepted);
    }
}
