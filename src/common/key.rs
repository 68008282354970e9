use crate::common;

use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};

/// Attribute name used for the partition key when only a value is given.
pub const DEFAULT_PARTITION_KEY: &str = "id";

/// Key component.
///
/// ```rust
/// use dynamodb_wrap::common::key;
///
/// let key = key::Key {
///     name: "id".to_string(),
///     value: 42,
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key<T> {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: T,
}

/// Primary key (partition key and optional sort key).
///
/// ```rust
/// use dynamodb_wrap::common::key;
///
/// // `{ "id": 42 }`
/// let keys = key::Keys::id(42);
/// assert_eq!(keys.partition_key.name, "id");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keys<T> {
    /// The partition key (required).
    pub partition_key: Key<T>,
    /// The sort key (only for tables with composite primary keys).
    pub sort_key: Option<Key<T>>,
}

impl<T> Keys<T> {
    /// A primary key made of the [`DEFAULT_PARTITION_KEY`] attribute alone.
    pub fn id(value: T) -> Self {
        Self {
            partition_key: Key {
                name: DEFAULT_PARTITION_KEY.to_string(),
                value,
            },
            sort_key: None,
        }
    }
}

impl<T: Serialize> TryFrom<Keys<T>> for common::Item {
    type Error = Error;

    fn try_from(key: Keys<T>) -> Result<Self> {
        let partition_key_value = to_attribute_value(key.partition_key.value)?;
        let mut keys = Self::from([(key.partition_key.name, partition_key_value)]);
        if let Some(sort_key) = key.sort_key {
            let sort_key_value = to_attribute_value(sort_key.value)?;
            keys.insert(sort_key.name, sort_key_value);
        }
        Ok(keys)
    }
}
