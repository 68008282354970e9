use crate::common;

use aws_sdk_dynamodb::{operation, types};

/// One response of a paginated read (Scan or Query).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    /// The items of this page, in the order DynamoDB returned them.
    pub items: Option<Vec<common::Item>>,
    /// The number of items in this page.
    pub count: Option<i32>,
    /// The number of items evaluated before any filter was applied.
    pub scanned_count: Option<i32>,
    /// The key to resume from; present only when more pages remain.
    pub last_evaluated_key: Option<common::Item>,
    /// The capacity consumed by this page, when requested.
    pub consumed_capacity: Option<types::ConsumedCapacity>,
}

impl Page {
    /// The continuation key, ignoring an empty one.
    pub fn continuation_key(&self) -> Option<&common::Item> {
        self.last_evaluated_key
            .as_ref()
            .filter(|last_evaluated_key| !last_evaluated_key.is_empty())
    }
}

impl From<operation::scan::ScanOutput> for Page {
    fn from(output: operation::scan::ScanOutput) -> Self {
        Self {
            items: output.items,
            count: Some(output.count),
            scanned_count: Some(output.scanned_count),
            last_evaluated_key: output.last_evaluated_key,
            consumed_capacity: output.consumed_capacity,
        }
    }
}

impl From<operation::query::QueryOutput> for Page {
    fn from(output: operation::query::QueryOutput) -> Self {
        Self {
            items: output.items,
            count: Some(output.count),
            scanned_count: Some(output.scanned_count),
            last_evaluated_key: output.last_evaluated_key,
            consumed_capacity: output.consumed_capacity,
        }
    }
}

/// All pages of a read folded together.
///
/// A field stays `None` until some page defines it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregateResult {
    /// The items of every page, in arrival order.
    pub items: Option<Vec<common::Item>>,
    /// The summed item count.
    pub count: Option<i32>,
    /// The summed scanned count.
    pub scanned_count: Option<i32>,
    /// The summed consumed capacity.
    pub consumed_capacity: Option<types::ConsumedCapacity>,
}

/// Incremental fold of pages into an [`AggregateResult`].
///
/// ```rust
/// use dynamodb_wrap::read::page::{Aggregator, Page};
///
/// let mut aggregator = Aggregator::default();
/// aggregator.push(Page {
///     count: Some(2),
///     ..Default::default()
/// });
/// aggregator.push(Page {
///     count: Some(3),
///     ..Default::default()
/// });
/// assert_eq!(aggregator.finish().count, Some(5));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregator {
    result: AggregateResult,
    last_evaluated_key: Option<common::Item>,
}

impl Aggregator {
    /// Fold one page into the accumulator.
    pub fn push(&mut self, page: Page) {
        if let Some(items) = page.items.filter(|items| !items.is_empty()) {
            self.result.items.get_or_insert_with(Vec::new).extend(items);
        }
        if let Some(count) = page.count {
            *self.result.count.get_or_insert(0) += count;
        }
        if let Some(scanned_count) = page.scanned_count {
            *self.result.scanned_count.get_or_insert(0) += scanned_count;
        }
        if let Some(last_evaluated_key) = page
            .last_evaluated_key
            .filter(|last_evaluated_key| !last_evaluated_key.is_empty())
        {
            self.last_evaluated_key = Some(last_evaluated_key);
        }
        let empty_capacity = types::ConsumedCapacity::builder().build();
        if let Some(consumed_capacity) = page
            .consumed_capacity
            .filter(|consumed_capacity| *consumed_capacity != empty_capacity)
        {
            let merged =
                common::capacity::merge(self.result.consumed_capacity.take(), consumed_capacity);
            self.result.consumed_capacity = Some(merged);
        }
    }

    /// The last continuation key seen so far.
    ///
    /// `Some` after [`Aggregator::finish`] would mean the read was not drained.
    pub fn last_evaluated_key(&self) -> Option<&common::Item> {
        self.last_evaluated_key.as_ref()
    }

    /// The folded result, without any continuation key.
    pub fn finish(self) -> AggregateResult {
        self.result
    }
}

/// Fold `pages`, left to right, into one [`AggregateResult`].
pub fn aggregate<I: IntoIterator<Item = Page>>(pages: I) -> AggregateResult {
    let mut aggregator = Aggregator::default();
    for page in pages {
        aggregator.push(page);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn item(id: &str) -> common::Item {
        common::Item::from([(
            "id".to_string(),
            types::AttributeValue::S(id.to_string()),
        )])
    }

    #[rstest]
    #[case::no_pages(
        vec![],
        AggregateResult::default()
    )]
    #[case::empty_page(
        vec![
            Page {
                items: Some(vec![]),
                ..Default::default()
            },
        ],
        AggregateResult::default()
    )]
    #[case::two_pages(
        vec![
            Page {
                items: Some(vec![item("foo")]),
                count: Some(1),
                scanned_count: Some(1),
                last_evaluated_key: Some(item("foo")),
                ..Default::default()
            },
            Page {
                items: Some(vec![item("bar")]),
                count: Some(1),
                scanned_count: Some(1),
                ..Default::default()
            },
        ],
        AggregateResult {
            items: Some(vec![item("foo"), item("bar")]),
            count: Some(2),
            scanned_count: Some(2),
            ..Default::default()
        }
    )]
    #[case::trailing_empty_items(
        vec![
            Page {
                items: Some(vec![item("foo")]),
                last_evaluated_key: Some(item("foo")),
                ..Default::default()
            },
            Page {
                items: Some(vec![]),
                ..Default::default()
            },
        ],
        AggregateResult {
            items: Some(vec![item("foo")]),
            ..Default::default()
        }
    )]
    #[case::count_defined_by_one_page_only(
        vec![
            Page {
                count: Some(4),
                ..Default::default()
            },
            Page::default(),
        ],
        AggregateResult {
            count: Some(4),
            ..Default::default()
        }
    )]
    #[case::consumed_capacity(
        vec![
            Page {
                consumed_capacity: Some(
                    types::ConsumedCapacity::builder()
                        .table_name("foo")
                        .capacity_units(1.0)
                        .build()
                ),
                ..Default::default()
            },
            Page::default(),
            Page {
                consumed_capacity: Some(
                    types::ConsumedCapacity::builder()
                        .table_name("foo")
                        .capacity_units(1.0)
                        .build()
                ),
                ..Default::default()
            },
        ],
        AggregateResult {
            consumed_capacity: Some(
                types::ConsumedCapacity::builder()
                    .table_name("foo")
                    .capacity_units(2.0)
                    .build()
            ),
            ..Default::default()
        }
    )]
    #[case::empty_consumed_capacity(
        vec![
            Page {
                count: Some(1),
                consumed_capacity: Some(
                    types::ConsumedCapacity::builder().build()
                ),
                ..Default::default()
            },
        ],
        AggregateResult {
            count: Some(1),
            ..Default::default()
        }
    )]
    #[case::empty_consumed_capacity_after_capacity(
        vec![
            Page {
                consumed_capacity: Some(
                    types::ConsumedCapacity::builder()
                        .table_name("foo")
                        .capacity_units(1.0)
                        .build()
                ),
                ..Default::default()
            },
            Page {
                consumed_capacity: Some(
                    types::ConsumedCapacity::builder().build()
                ),
                ..Default::default()
            },
        ],
        AggregateResult {
            consumed_capacity: Some(
                types::ConsumedCapacity::builder()
                    .table_name("foo")
                    .capacity_units(1.0)
                    .build()
            ),
            ..Default::default()
        }
    )]
    fn test_aggregate(#[case] pages: Vec<Page>, #[case] expected: AggregateResult) {
        assert_eq!(aggregate(pages), expected);
    }

    #[test]
    fn test_last_evaluated_key_last_seen_wins() {
        let mut aggregator = Aggregator::default();
        aggregator.push(Page {
            last_evaluated_key: Some(item("a")),
            ..Default::default()
        });
        aggregator.push(Page {
            last_evaluated_key: Some(item("b")),
            ..Default::default()
        });
        aggregator.push(Page::default());
        assert_eq!(aggregator.last_evaluated_key(), Some(&item("b")));
        assert_eq!(aggregator.finish(), AggregateResult::default());
    }

    #[rstest]
    #[case::absent(None, None)]
    #[case::empty(Some(common::Item::new()), None)]
    #[case::present(Some(item("a")), Some(item("a")))]
    fn test_continuation_key(
        #[case] last_evaluated_key: Option<common::Item>,
        #[case] expected: Option<common::Item>,
    ) {
        let page = Page {
            last_evaluated_key,
            ..Default::default()
        };
        assert_eq!(page.continuation_key(), expected.as_ref());
    }

    #[test]
    fn test_page_from_scan_output() {
        let output = operation::scan::ScanOutput::builder()
            .items(item("a"))
            .count(1)
            .scanned_count(3)
            .build();
        let page: Page = output.into();
        assert_eq!(page.items, Some(vec![item("a")]));
        assert_eq!(page.count, Some(1));
        assert_eq!(page.scanned_count, Some(3));
        assert_eq!(page.last_evaluated_key, None);
    }
}
