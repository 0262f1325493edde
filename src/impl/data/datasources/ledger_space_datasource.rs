use async_trait::async_trait;
use fractic_server_error::ServerError;
use futures::stream::{self, BoxStream, StreamExt};

use crate::{
    entities::{DateRange, LedgerAccount, LedgerEntries, RawLedgerTransaction},
    errors::LedgerStoreFailure,
};

/// Stream returned by the ledger store. An `Err` item is the store's terminal
/// error; the end of the stream means it completed successfully.
pub type LedgerStream<T> = BoxStream<'static, Result<T, ServerError>>;

/// Read access to a double-entry ledger store.
#[async_trait]
pub trait LedgerSpace: Send + Sync {
    /// Raw transactions dated within any of `ranges` that post to any of
    /// `accounts`, in the store's delivery order.
    async fn slice(
        &self,
        accounts: &[LedgerAccount],
        ranges: &[DateRange],
        extra: Option<&serde_json::Value>,
    ) -> Result<LedgerStream<RawLedgerTransaction>, ServerError>;

    /// Pre-aggregated entries for `accounts` over `ranges`.
    async fn projection(
        &self,
        accounts: &[LedgerAccount],
        ranges: &[DateRange],
        extra: Option<&serde_json::Value>,
    ) -> Result<LedgerStream<LedgerEntries>, ServerError>;
}

/// Ledger store held in memory, ordered by moment.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedgerSpace {
    transactions: Vec<RawLedgerTransaction>,
    fail_after: Option<usize>,
}

impl InMemoryLedgerSpace {
    pub fn new(mut transactions: Vec<RawLedgerTransaction>) -> Self {
        transactions.sort_by_key(|t| t.moment);
        Self {
            transactions,
            fail_after: None,
        }
    }

    /// Makes every stream end with a store failure after `n` items.
    pub fn with_failure_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    fn stream_of<T: Send + 'static>(&self, items: Vec<T>) -> LedgerStream<T> {
        match self.fail_after {
            None => stream::iter(items.into_iter().map(Ok)).boxed(),
            Some(n) => stream::iter(items.into_iter().take(n).map(Ok))
                .chain(stream::once(async {
                    Err(LedgerStoreFailure::new("stream interrupted"))
                }))
                .boxed(),
        }
    }
}

#[async_trait]
impl LedgerSpace for InMemoryLedgerSpace {
    async fn slice(
        &self,
        accounts: &[LedgerAccount],
        ranges: &[DateRange],
        _extra: Option<&serde_json::Value>,
    ) -> Result<LedgerStream<RawLedgerTransaction>, ServerError> {
        let matching = self
            .transactions
            .iter()
            .filter(|t| ranges.iter().any(|r| r.contains(&t.date)))
            .filter(|t| t.entries.keys().any(|k| accounts.contains(k)))
            .cloned()
            .collect::<Vec<_>>();
        Ok(self.stream_of(matching))
    }

    async fn projection(
        &self,
        accounts: &[LedgerAccount],
        ranges: &[DateRange],
        _extra: Option<&serde_json::Value>,
    ) -> Result<LedgerStream<LedgerEntries>, ServerError> {
        let aggregated = ranges
            .iter()
            .map(|r| {
                self.transactions
                    .iter()
                    .filter(|t| r.contains(&t.date))
                    .flat_map(|t| t.entries.iter())
                    .filter(|(k, _)| accounts.contains(k))
                    .fold(LedgerEntries::new(), |mut acc, (k, v)| {
                        *acc.entry(*k).or_insert(0) += v;
                        acc
                    })
            })
            .collect::<Vec<_>>();
        Ok(self.stream_of(aggregated))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use futures::TryStreamExt as _;

    use super::*;
    use crate::entities::{LedgerDate, Moment};

    fn date(y: i32, m: u32, d: u32) -> LedgerDate {
        LedgerDate(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn tx(moment: i64, on: LedgerDate, entries: &[(u32, i64)]) -> RawLedgerTransaction {
        RawLedgerTransaction {
            moment: Moment(moment),
            date: on,
            entries: entries
                .iter()
                .map(|(k, v)| (LedgerAccount::new(*k), *v))
                .collect(),
            metadata: Vec::new(),
        }
    }

    fn space() -> InMemoryLedgerSpace {
        InMemoryLedgerSpace::new(vec![
            tx(3, date(2024, 2, 1), &[(1, 50), (3, -50)]),
            tx(1, date(2024, 1, 5), &[(1, 100), (2, -100)]),
            tx(2, date(2024, 1, 20), &[(2, 10), (3, -10)]),
        ])
    }

    fn january() -> DateRange {
        DateRange::new(date(2024, 1, 1), date(2024, 1, 31))
    }

    #[tokio::test]
    async fn slice_filters_by_range_and_account_in_moment_order() {
        let txs = space()
            .slice(&[LedgerAccount::new(2)], &[january()], None)
            .await
            .unwrap()
            .try_collect::<Vec<_>>()
            .await
            .unwrap();
        let moments = txs.iter().map(|t| t.moment.0).collect::<Vec<_>>();
        assert_eq!(moments, vec![1, 2]);
        // Entries are passed through untouched.
        assert_eq!(txs[0].entries.len(), 2);
    }

    #[tokio::test]
    async fn projection_sums_requested_accounts_only() {
        let aggregated = space()
            .projection(
                &[LedgerAccount::new(1), LedgerAccount::new(2)],
                &[january()],
                None,
            )
            .await
            .unwrap()
            .try_collect::<Vec<_>>()
            .await
            .unwrap();
        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].get(&LedgerAccount::new(1)), Some(&100));
        assert_eq!(aggregated[0].get(&LedgerAccount::new(2)), Some(&-90));
        assert_eq!(aggregated[0].get(&LedgerAccount::new(3)), None);
    }

    #[tokio::test]
    async fn injected_failure_ends_the_stream() {
        let items = space()
            .with_failure_after(1)
            .slice(&[LedgerAccount::new(2)], &[january()], None)
            .await
            .unwrap()
            .collect::<Vec<_>>()
            .await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }
}
