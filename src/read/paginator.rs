use crate::{common, read};

use std::future::Future;

/// Read requests that can resume from a continuation key.
pub trait WithExclusiveStartKey {
    /// This request, resuming after `exclusive_start_key`.
    fn with_exclusive_start_key(self, exclusive_start_key: common::Item) -> Self;
}

/// Fetch every page of a read and fold them into one [`read::page::AggregateResult`].
///
/// The first call to `fetch_page` receives a clone of `params`. Each following call
/// receives a fresh clone of `params` resuming after the previous page's
/// `LastEvaluatedKey`, until a page comes back without one. Calls are strictly
/// sequential. The first error is returned as-is and the pages fetched so far are
/// discarded.
///
/// ```rust
/// use dynamodb_wrap::{common, read};
///
/// #[derive(Clone)]
/// struct Params(Option<common::Item>);
///
/// impl read::paginator::WithExclusiveStartKey for Params {
///     fn with_exclusive_start_key(self, key: common::Item) -> Self {
///         Params(Some(key))
///     }
/// }
///
/// # async fn example() -> Result<(), std::convert::Infallible> {
/// let result = read::paginator::paginate(&Params(None), |_params| async {
///     Ok::<_, std::convert::Infallible>(read::page::Page {
///         count: Some(1),
///         ..Default::default()
///     })
/// })
/// .await?;
/// assert_eq!(result.count, Some(1));
/// # Ok(())
/// # }
/// ```
pub async fn paginate<P, F, Fut, E>(
    params: &P,
    mut fetch_page: F,
) -> Result<read::page::AggregateResult, E>
where
    P: Clone + WithExclusiveStartKey,
    F: FnMut(P) -> Fut,
    Fut: Future<Output = Result<read::page::Page, E>>,
{
    let mut aggregator = read::page::Aggregator::default();
    let mut page = fetch_page(params.clone()).await?;
    #[cfg(feature = "tracing")]
    let mut fetched = 1usize;
    loop {
        let continuation_key = page.continuation_key().cloned();
        aggregator.push(page);
        let Some(exclusive_start_key) = continuation_key else {
            break;
        };
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(fetched, "following continuation key");
            fetched += 1;
        }
        let next_params = params.clone().with_exclusive_start_key(exclusive_start_key);
        page = fetch_page(next_params).await?;
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(pages = fetched, "pagination drained");
    Ok(aggregator.finish())
}
