use crate::{common, read};

use aws_sdk_dynamodb::types;
use serde::{Serialize, de::DeserializeOwned};
use serde_dynamo::{Error, Result, from_items, to_attribute_value};
use std::collections;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SingleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) table_name: String,
}

/// Arguments for single-item read operations (GetItem).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SingleReadArgs {
    /// Whether to use a consistent read.
    ///
    /// `true` for strongly consistent reads, `false` or `None` for eventually consistent reads.
    pub consistent_read: Option<bool>,
    /// Which attributes to retrieve.
    ///
    /// If `None`, all attributes are retrieved. See [`common::Expression::projection`].
    pub projection: Option<common::Expression>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl TryFrom<SingleReadArgs> for SingleReadInput {
    type Error = Error;

    fn try_from(single_read_args: SingleReadArgs) -> Result<Self> {
        let mut expression_attribute_names = None;
        let projection_expression = single_read_args
            .projection
            .map(|projection| projection.merge_into(&mut expression_attribute_names, &mut None))
            .transpose()?;
        let operation = Self {
            consistent_read: single_read_args.consistent_read,
            expression_attribute_names,
            projection_expression,
            table_name: single_read_args.table_name,
        };
        Ok(operation)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) exclusive_start_key: Option<common::Item>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) filter_expression: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<i32>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) select: Option<types::Select>,
    pub(crate) table_name: String,
}

impl read::paginator::WithExclusiveStartKey for MultipleReadInput {
    fn with_exclusive_start_key(mut self, exclusive_start_key: common::Item) -> Self {
        self.exclusive_start_key = Some(exclusive_start_key);
        self
    }
}

/// Arguments for multiple-item read operations (Query, Scan).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadArgs<T> {
    /// Whether to use a consistent read.
    pub consistent_read: Option<bool>,
    /// The key to start reading after.
    ///
    /// Typically the `last_evaluated_key` of a [`read::page::Page`] read without
    /// auto-pagination.
    pub exclusive_start_key: Option<collections::HashMap<String, T>>,
    /// Filter applied to the items after they are read.
    pub filter: Option<common::Expression>,
    /// The name of a secondary index to read instead of the base table.
    pub index_name: Option<String>,
    /// The maximum number of items to evaluate per page.
    pub limit: Option<i32>,
    /// Which attributes to retrieve. See [`common::Expression::projection`].
    pub projection: Option<common::Expression>,
    /// Which attributes to return (`Select::Count` returns counts only).
    pub select: Option<types::Select>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl<T: Serialize> TryFrom<MultipleReadArgs<T>> for MultipleReadInput {
    type Error = Error;

    fn try_from(multiple_read_args: MultipleReadArgs<T>) -> Result<Self> {
        let exclusive_start_key = match multiple_read_args.exclusive_start_key {
            Some(exclusive_start_key) => {
                let mut serialized_exclusive_start_key =
                    collections::HashMap::with_capacity(exclusive_start_key.len());
                for (key, value) in exclusive_start_key {
                    let value = to_attribute_value(value)?;
                    serialized_exclusive_start_key.insert(key, value);
                }
                Some(serialized_exclusive_start_key)
            }
            None => None,
        };
        let mut expression_attribute_names = None;
        let mut expression_attribute_values = None;
        let filter_expression = multiple_read_args
            .filter
            .map(|filter| {
                filter.merge_into(
                    &mut expression_attribute_names,
                    &mut expression_attribute_values,
                )
            })
            .transpose()?;
        let projection_expression = multiple_read_args
            .projection
            .map(|projection| {
                projection.merge_into(
                    &mut expression_attribute_names,
                    &mut expression_attribute_values,
                )
            })
            .transpose()?;
        let operation = Self {
            consistent_read: multiple_read_args.consistent_read,
            exclusive_start_key,
            expression_attribute_names,
            expression_attribute_values,
            filter_expression,
            index_name: multiple_read_args.index_name,
            limit: multiple_read_args.limit,
            projection_expression,
            select: multiple_read_args.select,
            table_name: multiple_read_args.table_name,
        };
        Ok(operation)
    }
}

/// How multiple-item reads run and what they return.
///
/// ```rust
/// use dynamodb_wrap::read::common::{ReadOptions, ReadOptionsOverrides};
///
/// let options = ReadOptions::default().merge(ReadOptionsOverrides {
///     raw: Some(true),
///     ..Default::default()
/// });
/// assert!(options.autopagination);
/// assert!(options.raw);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ReadOptions {
    /// Follow continuation keys until every page is read.
    pub autopagination: bool,
    /// Return the DynamoDB response instead of the unwrapped items.
    pub raw: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            autopagination: true,
            raw: false,
        }
    }
}

/// Caller overrides for [`ReadOptions`]; `None` keeps the default.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ReadOptionsOverrides {
    /// Overrides [`ReadOptions::autopagination`].
    pub autopagination: Option<bool>,
    /// Overrides [`ReadOptions::raw`].
    pub raw: Option<bool>,
}

impl ReadOptions {
    /// These options with `overrides` applied.
    pub fn merge(self, overrides: ReadOptionsOverrides) -> Self {
        Self {
            autopagination: overrides.autopagination.unwrap_or(self.autopagination),
            raw: overrides.raw.unwrap_or(self.raw),
        }
    }
}

/// Result of a multiple-item read, shaped by [`ReadOptions`].
#[derive(Clone, Debug, PartialEq)]
pub enum ReadOutput<D> {
    /// The unwrapped items (`raw: false`).
    Items(Vec<D>),
    /// Every page folded together (`raw: true`, `autopagination: true`).
    Aggregate(read::page::AggregateResult),
    /// The first page only (`raw: true`, `autopagination: false`).
    Page(read::page::Page),
}

impl<D> ReadOutput<D> {
    /// The unwrapped items, if this output carries them.
    pub fn into_items(self) -> Option<Vec<D>> {
        match self {
            Self::Items(items) => Some(items),
            Self::Aggregate(_) | Self::Page(_) => None,
        }
    }
}

impl<D: DeserializeOwned> ReadOutput<D> {
    pub(crate) fn from_aggregate(aggregate: read::page::AggregateResult, raw: bool) -> Result<Self> {
        if raw {
            return Ok(Self::Aggregate(aggregate));
        }
        let items = from_items(aggregate.items.unwrap_or_default())?;
        Ok(Self::Items(items))
    }

    pub(crate) fn from_page(page: read::page::Page, raw: bool) -> Result<Self> {
        if raw {
            return Ok(Self::Page(page));
        }
        let items = from_items(page.items.unwrap_or_default())?;
        Ok(Self::Items(items))
    }
}

/// apply common single read operation settings to a builder
#[macro_export]
macro_rules! apply_single_read_operation {
    ($builder:expr, $single_read_operation:expr) => {
        $builder
            .set_consistent_read($single_read_operation.consistent_read)
            .set_expression_attribute_names($single_read_operation.expression_attribute_names)
            .set_projection_expression($single_read_operation.projection_expression)
            .table_name($single_read_operation.table_name)
    };
}

/// apply common multiple read operation settings to a builder
#[macro_export]
macro_rules! apply_multiple_read_operation {
    ($builder:expr, $multiple_read_operation:expr) => {
        $builder
            .set_consistent_read($multiple_read_operation.consistent_read)
            .set_exclusive_start_key($multiple_read_operation.exclusive_start_key)
            .set_expression_attribute_names($multiple_read_operation.expression_attribute_names)
            .set_expression_attribute_values($multiple_read_operation.expression_attribute_values)
            .set_filter_expression($multiple_read_operation.filter_expression)
            .set_index_name($multiple_read_operation.index_name)
            .set_limit($multiple_read_operation.limit)
            .set_projection_expression($multiple_read_operation.projection_expression)
            .set_select($multiple_read_operation.select)
            .table_name($multiple_read_operation.table_name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case::empty(
        SingleReadArgs {
            table_name: "a".to_string(),
            ..Default::default()
        },
        SingleReadInput {
            table_name: "a".to_string(),
            ..Default::default()
        }
    )]
    #[case::projection(
        SingleReadArgs {
            consistent_read: Some(true),
            projection: Some(
                common::Expression::projection(["b", "c"])
            ),
            table_name: "a".to_string(),
        },
        SingleReadInput {
            consistent_read: Some(true),
            expression_attribute_names: Some(
                collections::HashMap::from(
                    [
                        ("#b".to_string(), "b".to_string()),
                        ("#c".to_string(), "c".to_string()),
                    ]
                )
            ),
            projection_expression: Some(
                "#b, #c".to_string()
            ),
            table_name: "a".to_string(),
        }
    )]
    fn test_single_read_args(#[case] args: SingleReadArgs, #[case] expected: SingleReadInput) {
        let actual: SingleReadInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::empty(
        MultipleReadArgs {
            table_name: "a".to_string(),
            ..Default::default()
        },
        MultipleReadInput {
            table_name: "a".to_string(),
            ..Default::default()
        }
    )]
    #[case::full(
        MultipleReadArgs {
            consistent_read: Some(false),
            exclusive_start_key: Some(
                collections::HashMap::from(
                    [
                        ("b".to_string(), Value::String("c".to_string())),
                    ]
                )
            ),
            filter: Some(
                common::Expression::equals("d", "e").unwrap()
            ),
            index_name: Some(
                "f".to_string()
            ),
            limit: Some(10),
            projection: Some(
                common::Expression::projection(["g"])
            ),
            select: Some(
                types::Select::SpecificAttributes
            ),
            table_name: "a".to_string(),
        },
        MultipleReadInput {
            consistent_read: Some(false),
            exclusive_start_key: Some(
                common::Item::from(
                    [
                        ("b".to_string(), types::AttributeValue::S("c".to_string())),
                    ]
                )
            ),
            expression_attribute_names: Some(
                collections::HashMap::from(
                    [
                        ("#d".to_string(), "d".to_string()),
                        ("#g".to_string(), "g".to_string()),
                    ]
                )
            ),
            expression_attribute_values: Some(
                collections::HashMap::from(
                    [
                        (":d".to_string(), types::AttributeValue::S("e".to_string())),
                    ]
                )
            ),
            filter_expression: Some(
                "#d = :d".to_string()
            ),
            index_name: Some(
                "f".to_string()
            ),
            limit: Some(10),
            projection_expression: Some(
                "#g".to_string()
            ),
            select: Some(
                types::Select::SpecificAttributes
            ),
            table_name: "a".to_string(),
        }
    )]
    fn test_multiple_read_args(
        #[case] args: MultipleReadArgs<Value>,
        #[case] expected: MultipleReadInput,
    ) {
        let actual: MultipleReadInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::defaults(
        ReadOptionsOverrides::default(),
        ReadOptions {
            autopagination: true,
            raw: false,
        }
    )]
    #[case::raw(
        ReadOptionsOverrides {
            raw: Some(true),
            ..Default::default()
        },
        ReadOptions {
            autopagination: true,
            raw: true,
        }
    )]
    #[case::single_page(
        ReadOptionsOverrides {
            autopagination: Some(false),
            raw: Some(false),
        },
        ReadOptions {
            autopagination: false,
            raw: false,
        }
    )]
    fn test_read_options_merge(
        #[case] overrides: ReadOptionsOverrides,
        #[case] expected: ReadOptions,
    ) {
        assert_eq!(ReadOptions::default().merge(overrides), expected);
    }

    #[test]
    fn test_read_output_unwraps_items() {
        let aggregate = read::page::AggregateResult {
            items: Some(vec![common::Item::from([(
                "id".to_string(),
                types::AttributeValue::S("foo".to_string()),
            )])]),
            count: Some(1),
            ..Default::default()
        };
        let output: ReadOutput<Value> = ReadOutput::from_aggregate(aggregate, false).unwrap();
        assert_eq!(output, ReadOutput::Items(vec![json!({"id": "foo"})]));
    }

    #[test]
    fn test_read_output_empty_read_unwraps_to_no_items() {
        let output: ReadOutput<Value> =
            ReadOutput::from_page(read::page::Page::default(), false).unwrap();
        assert_eq!(output.into_items(), Some(vec![]));
    }

    #[test]
    fn test_read_output_raw_keeps_page() {
        let page = read::page::Page {
            count: Some(0),
            ..Default::default()
        };
        let output: ReadOutput<Value> = ReadOutput::from_page(page.clone(), true).unwrap();
        assert_eq!(output, ReadOutput::Page(page));
    }
}
