use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};

/// scan operation
#[derive(Clone, Debug, Default, PartialEq)]
struct ScanInput {
    multiple_read_operation: read::common::MultipleReadInput,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    segment: Option<i32>,
    total_segments: Option<i32>,
}

impl read::paginator::WithExclusiveStartKey for ScanInput {
    fn with_exclusive_start_key(mut self, exclusive_start_key: common::Item) -> Self {
        self.multiple_read_operation = self
            .multiple_read_operation
            .with_exclusive_start_key(exclusive_start_key);
        self
    }
}

impl ScanInput {
    async fn fetch_page(
        self,
        client: &Client,
    ) -> Result<read::page::Page, error::SdkError<operation::scan::ScanError>> {
        let builder = client
            .scan()
            .set_return_consumed_capacity(self.return_consumed_capacity)
            .set_segment(self.segment)
            .set_total_segments(self.total_segments);
        let output = crate::apply_multiple_read_operation!(builder, self.multiple_read_operation)
            .send()
            .await?;
        Ok(output.into())
    }
}

/// Scan operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_wrap::read;
/// use serde_json::Value;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let scan: read::scan::Scan<Value> = read::scan::Scan {
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "flights".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let result = scan.send(client).await?;
/// println!("{:?} items", result.count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan<T> {
    /// Additional read operation arguments (table name, filter, projection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// The segment number for parallel scans (0-indexed).
    pub segment: Option<i32>,
    /// The total number of segments for parallel scans.
    pub total_segments: Option<i32>,
}

impl<T> common::TableName for Scan<T> {
    fn table_name_mut(&mut self) -> &mut String {
        &mut self.multiple_read_args.table_name
    }
}

impl<T: Serialize> TryFrom<Scan<T>> for ScanInput {
    type Error = Error;

    fn try_from(scan: Scan<T>) -> Result<Self> {
        let multiple_read_operation: read::common::MultipleReadInput =
            scan.multiple_read_args.try_into()?;
        let operation = Self {
            multiple_read_operation,
            return_consumed_capacity: scan.return_consumed_capacity,
            segment: scan.segment,
            total_segments: scan.total_segments,
        };
        Ok(operation)
    }
}

impl<T: Serialize> Scan<T> {
    /// Execute the scan operation, reading every page.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.scan", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<read::page::AggregateResult, error::SdkError<operation::scan::ScanError>> {
        let scan: ScanInput = self.try_into().map_err(error::BuildError::other)?;
        read::paginator::paginate(&scan, |scan| scan.fetch_page(client)).await
    }

    /// Execute the scan operation, reading the first page only.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.scan_page", skip_all, err)
    )]
    pub async fn send_page(
        self,
        client: &Client,
    ) -> Result<read::page::Page, error::SdkError<operation::scan::ScanError>> {
        let scan: ScanInput = self.try_into().map_err(error::BuildError::other)?;
        scan.fetch_page(client).await
    }

    /// Count the items of every page, without retrieving them.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_wrap.scan_count", skip_all, err)
    )]
    pub async fn count(
        self,
        client: &Client,
    ) -> Result<i32, error::SdkError<operation::scan::ScanError>> {
        let result = self.counting().send(client).await?;
        Ok(result.count.unwrap_or_default())
    }
}

impl<T> Scan<T> {
    /// Select counts only. A projection is only accepted with `SPECIFIC_ATTRIBUTES`.
    fn counting(mut self) -> Self {
        self.multiple_read_args.select = Some(types::Select::Count);
        self.multiple_read_args.projection = None;
        self
    }
}
