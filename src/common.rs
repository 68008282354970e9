//! Common utilities for DynamoDB operations.
//!
//! This module provides shared types used across read and write operations:
//! expressions with their placeholder maps, primary keys, consumed capacity
//! aggregation and the crate error type.

/// Consumed capacity aggregation across paginated responses.
pub mod capacity;

/// Error type returned by the [`crate::client`] facade.
pub mod error;

/// Key types for identifying items in DynamoDB tables.
pub mod key;

use aws_sdk_dynamodb::types;
use serde::{Serialize, ser::Error as _};
use serde_dynamo::{Error, Result, to_attribute_value};
use std::{collections, fmt};

/// A raw DynamoDB item, as sent on the wire.
pub type Item = collections::HashMap<String, types::AttributeValue>;

/// An expression together with its attribute name and value placeholders.
///
/// This is the state threaded through the update expression [`crate::builders`],
/// and the form in which filters, conditions and projections are handed to the
/// request builders.
///
/// ```rust
/// use dynamodb_wrap::common::Expression;
///
/// let filter = Expression::equals("status", "active").unwrap();
/// assert_eq!(filter.expression, "#status = :status");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expression {
    /// The expression text, referencing `#name` and `:value` placeholders.
    pub expression: String,
    /// Placeholder to attribute name substitutions.
    pub expression_attribute_names: collections::HashMap<String, String>,
    /// Placeholder to attribute value substitutions.
    pub expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl Expression {
    /// An equality comparison `#name = :name`.
    pub fn equals<T: Serialize>(name: impl fmt::Display, value: T) -> Result<Self> {
        let name = name.to_string();
        let value = to_attribute_value(value)?;
        let expression = Self {
            expression: format!("#{name} = :{name}"),
            expression_attribute_names: collections::HashMap::from([(format!("#{name}"), name.clone())]),
            expression_attribute_values: collections::HashMap::from([(format!(":{name}"), value)]),
        };
        Ok(expression)
    }

    /// A projection `#a, #b, ...` selecting the given attributes.
    pub fn projection<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let mut placeholders = Vec::new();
        let mut expression_attribute_names = collections::HashMap::new();
        for name in names {
            let name = name.to_string();
            let placeholder = format!("#{name}");
            placeholders.push(placeholder.clone());
            expression_attribute_names.insert(placeholder, name);
        }
        Self {
            expression: placeholders.join(", "),
            expression_attribute_names,
            ..Default::default()
        }
    }

    /// Join two expressions with `operator`, merging their placeholders.
    ///
    /// An empty side yields the other one unchanged. Fails when both sides bind the
    /// same placeholder to different names or values.
    pub fn join(mut self, operator: &str, other: Self) -> Result<Self> {
        bind(
            &mut self.expression_attribute_names,
            other.expression_attribute_names,
        )?;
        bind(
            &mut self.expression_attribute_values,
            other.expression_attribute_values,
        )?;
        self.expression = if self.expression.is_empty() {
            other.expression
        } else if other.expression.is_empty() {
            self.expression
        } else {
            format!("{}{operator}{}", self.expression, other.expression)
        };
        Ok(self)
    }

    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, types::AttributeValue>>,
    ) -> Result<String> {
        if !self.expression_attribute_names.is_empty() {
            bind(names.get_or_insert_default(), self.expression_attribute_names)?;
        }
        if !self.expression_attribute_values.is_empty() {
            bind(values.get_or_insert_default(), self.expression_attribute_values)?;
        }
        Ok(self.expression)
    }
}

/// Add `incoming` placeholders to `existing`, rejecting a placeholder already bound elsewhere.
fn bind<V: PartialEq + fmt::Debug>(
    existing: &mut collections::HashMap<String, V>,
    incoming: collections::HashMap<String, V>,
) -> Result<()> {
    for (placeholder, value) in incoming {
        match existing.get(&placeholder) {
            Some(bound) if *bound != value => {
                return Err(Error::custom(format!(
                    "placeholder {placeholder} is bound to both {bound:?} and {value:?}"
                )));
            }
            Some(_) => {}
            None => {
                existing.insert(placeholder, value);
            }
        }
    }
    Ok(())
}

/// Requests addressed to a single table.
///
/// Used by [`crate::client::Table`] to scope requests to its table.
pub trait TableName {
    /// Mutable access to the request's table name.
    fn table_name_mut(&mut self) -> &mut String;

    /// Set the table name unless the request already carries one.
    fn with_default_table_name(mut self, table_name: &str) -> Self
    where
        Self: Sized,
    {
        let current = self.table_name_mut();
        if current.is_empty() {
            *current = table_name.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::both(
        Expression::equals("a", 1).unwrap(),
        Expression::equals("b", "c").unwrap(),
        Expression {
            expression: "#a = :a AND #b = :b".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#a".to_string(), "a".to_string()),
                    ("#b".to_string(), "b".to_string()),
                ]
            ),
            expression_attribute_values: collections::HashMap::from(
                [
                    (":a".to_string(), types::AttributeValue::N("1".to_string())),
                    (":b".to_string(), types::AttributeValue::S("c".to_string())),
                ]
            ),
        }
    )]
    #[case::left_empty(
        Expression::default(),
        Expression::projection(["a"]),
        Expression::projection(["a"])
    )]
    #[case::right_empty(
        Expression::projection(["a", "b"]),
        Expression::default(),
        Expression::projection(["a", "b"])
    )]
    fn test_join(#[case] left: Expression, #[case] right: Expression, #[case] expected: Expression) {
        assert_eq!(left.join(" AND ", right).unwrap(), expected);
    }

    #[rstest]
    #[case::same_binding(Expression::equals("a", 1).unwrap(), true)]
    #[case::different_value(Expression::equals("a", 2).unwrap(), false)]
    #[case::different_name(
        Expression {
            expression: "#a".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#a".to_string(), "b".to_string()),
                ]
            ),
            ..Default::default()
        },
        false
    )]
    fn test_join_conflicting_placeholders(#[case] other: Expression, #[case] joined: bool) {
        let actual = Expression::equals("a", 1).unwrap().join(" OR ", other);
        assert_eq!(actual.is_ok(), joined);
    }

    #[test]
    fn test_projection() {
        let actual = Expression::projection(["a", "b"]);
        assert_eq!(actual.expression, "#a, #b");
        assert_eq!(
            actual.expression_attribute_names,
            collections::HashMap::from([
                ("#a".to_string(), "a".to_string()),
                ("#b".to_string(), "b".to_string()),
            ])
        );
        assert!(actual.expression_attribute_values.is_empty());
    }

    #[test]
    fn test_merge_into_extends_existing() {
        let mut names = Some(collections::HashMap::from([(
            "#x".to_string(),
            "x".to_string(),
        )]));
        let mut values = None;
        let expression = Expression::equals("a", "b")
            .unwrap()
            .merge_into(&mut names, &mut values)
            .unwrap();
        assert_eq!(expression, "#a = :a");
        assert_eq!(names.unwrap().len(), 2);
        assert_eq!(
            values,
            Some(collections::HashMap::from([(
                ":a".to_string(),
                types::AttributeValue::S("b".to_string())
            )]))
        );
    }

    #[test]
    fn test_merge_into_skips_empty_maps() {
        let mut names = None;
        let mut values = None;
        let expression = Expression::projection(["a"])
            .merge_into(&mut names, &mut values)
            .unwrap();
        assert_eq!(expression, "#a");
        assert!(names.is_some());
        assert_eq!(values, None);
    }

    #[test]
    fn test_merge_into_rejects_rebound_value() {
        let mut names = None;
        let mut values = Some(collections::HashMap::from([(
            ":status".to_string(),
            types::AttributeValue::S("done".to_string()),
        )]));
        let actual = Expression::equals("status", "pending")
            .unwrap()
            .merge_into(&mut names, &mut values);
        assert!(actual.is_err());
        assert_eq!(
            values.unwrap()[":status"],
            types::AttributeValue::S("done".to_string())
        );
    }

    #[derive(Default)]
    struct Request {
        table_name: String,
    }

    impl TableName for Request {
        fn table_name_mut(&mut self) -> &mut String {
            &mut self.table_name
        }
    }

    #[rstest]
    #[case::empty("", "t")]
    #[case::explicit("u", "u")]
    fn test_with_default_table_name(#[case] current: &str, #[case] expected: &str) {
        let request = Request {
            table_name: current.to_string(),
        };
        assert_eq!(request.with_default_table_name("t").table_name, expected);
    }
}
