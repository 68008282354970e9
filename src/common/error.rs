use aws_sdk_dynamodb::error;
use thiserror::Error;

/// Error returned by the [`crate::client`] facade.
///
/// `E` is the operation error of the underlying SDK call (for example
/// `aws_sdk_dynamodb::operation::get_item::GetItemError`).
#[derive(Debug, Error)]
pub enum Error<E> {
    /// The request failed to build or DynamoDB rejected it.
    #[error(transparent)]
    Sdk(#[from] error::SdkError<E>),

    /// A response item could not be converted into the requested type.
    #[error(transparent)]
    Serde(#[from] serde_dynamo::Error),
}

/// Result alias for facade operations.
pub type Result<T, E> = std::result::Result<T, Error<E>>;
