//! Update expression builders.
//!
//! A builder is a function from one [`Expression`] to the next. Attribute
//! builders ([`put`], [`append`], [`add`], [`remove`]) each append one clause and
//! register its placeholders. [`update_expression`] wraps them into an action
//! block (`SET`, `ADD`, `REMOVE` or `DELETE`) and trims the separators, so blocks
//! can be chained with [`BuilderExt::then`] into one valid update expression.
//!
//! ```rust
//! use dynamodb_wrap::builders::{Action, BuilderExt, put, remove, update_expression};
//!
//! let expression = update_expression(Action::Set, put("destination", "Lisbon").then(put("seats", 3)))
//!     .then(update_expression(Action::Remove, remove("gate")))
//!     .build()
//!     .unwrap();
//! assert_eq!(
//!     expression.expression,
//!     "SET #destination = :destination, #seats = :seats REMOVE #gate"
//! );
//! ```
//!
//! Attribute names are used as given, without validation.

use crate::common::Expression;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Result, to_attribute_value};
use std::fmt;

/// A boxed builder, as carried by [`crate::write::update_item::UpdatePayload`].
pub type Builder = Box<dyn FnOnce(Expression) -> Result<Expression> + Send>;

/// Update expression action keywords.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    /// `SET`: assign attributes.
    Set,
    /// `ADD`: add to numbers and sets.
    Add,
    /// `REMOVE`: remove attributes.
    Remove,
    /// `DELETE`: delete elements from sets.
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::Set => "SET",
            Self::Add => "ADD",
            Self::Remove => "REMOVE",
            Self::Delete => "DELETE",
        };
        f.write_str(keyword)
    }
}

/// Combinators available on every builder.
pub trait BuilderExt: FnOnce(Expression) -> Result<Expression> + Sized {
    /// Run `next` on the output of this builder.
    fn then<N>(self, next: N) -> impl FnOnce(Expression) -> Result<Expression>
    where
        N: FnOnce(Expression) -> Result<Expression>,
    {
        then(self, next)
    }

    /// Apply this builder to an empty expression.
    fn build(self) -> Result<Expression> {
        self(Expression::default())
    }

    /// Box this builder.
    fn boxed(self) -> Builder
    where
        Self: Send + 'static,
    {
        Box::new(self)
    }
}

impl<F> BuilderExt for F where F: FnOnce(Expression) -> Result<Expression> {}

/// Compose two builders left to right.
pub fn then<F, N>(first: F, next: N) -> impl FnOnce(Expression) -> Result<Expression>
where
    F: FnOnce(Expression) -> Result<Expression>,
    N: FnOnce(Expression) -> Result<Expression>,
{
    move |expression| next(first(expression)?)
}

/// An `action` block made of the clauses appended by `operations`.
///
/// A block whose operations append nothing leaves the expression text as it was.
pub fn update_expression<F>(
    action: Action,
    operations: F,
) -> impl FnOnce(Expression) -> Result<Expression>
where
    F: FnOnce(Expression) -> Result<Expression>,
{
    move |mut expression| {
        let block = if expression.expression.is_empty() {
            format!("{action} ")
        } else {
            format!(" {action} ")
        };
        expression.expression.push_str(&block);
        let mut expression = operations(expression)?;
        if expression.expression.ends_with(&block) {
            let len = expression.expression.len() - block.len();
            expression.expression.truncate(len);
        } else {
            // trailing ", "
            expression.expression.pop();
            expression.expression.pop();
        }
        Ok(expression)
    }
}

fn push_clause(
    mut expression: Expression,
    clause: String,
    name: String,
    value: Option<types::AttributeValue>,
) -> Expression {
    expression.expression.push_str(&clause);
    if let Some(value) = value {
        expression
            .expression_attribute_values
            .insert(format!(":{name}"), value);
    }
    expression
        .expression_attribute_names
        .insert(format!("#{name}"), name);
    expression
}

/// `#name = :name`
pub fn put<T: Serialize>(
    name: impl fmt::Display,
    value: T,
) -> impl FnOnce(Expression) -> Result<Expression> {
    let name = name.to_string();
    move |expression| {
        let value = to_attribute_value(value)?;
        let clause = format!("#{name} = :{name}, ");
        Ok(push_clause(expression, clause, name, Some(value)))
    }
}

/// `#name = list_append(#name, :name)`
///
/// Fails at execution time if the attribute is not an existing list.
pub fn append<T: Serialize>(
    name: impl fmt::Display,
    value: T,
) -> impl FnOnce(Expression) -> Result<Expression> {
    let name = name.to_string();
    move |expression| {
        let value = to_attribute_value(value)?;
        let clause = format!("#{name} = list_append(#{name}, :{name}), ");
        Ok(push_clause(expression, clause, name, Some(value)))
    }
}

/// `#name :name`, for [`Action::Add`] and [`Action::Delete`] blocks.
pub fn add<T: Serialize>(
    name: impl fmt::Display,
    value: T,
) -> impl FnOnce(Expression) -> Result<Expression> {
    let name = name.to_string();
    move |expression| {
        let value = to_attribute_value(value)?;
        let clause = format!("#{name} :{name}, ");
        Ok(push_clause(expression, clause, name, Some(value)))
    }
}

/// `#name`
pub fn remove(name: impl fmt::Display) -> impl FnOnce(Expression) -> Result<Expression> {
    let name = name.to_string();
    move |expression| {
        let clause = format!("#{name}, ");
        Ok(push_clause(expression, clause, name, None))
    }
}
