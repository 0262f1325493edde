use log::trace;

use crate::entities::{FsEntries, LedgerEntries};

use super::index_resolver::IndexTable;

/// Re-keys raw ledger entries by chart account id. Shared by the streaming and
/// the aggregated paths.
pub(crate) struct EntryReconciler<'a> {
    table: &'a IndexTable,
}

impl<'a> EntryReconciler<'a> {
    pub(crate) fn new(table: &'a IndexTable) -> Self {
        Self { table }
    }

    /// Adds `raw` into `out`. Entries on ledger accounts outside the table are
    /// dropped.
    // TODO: surface a data-integrity error instead of dropping once callers
    // can distinguish chart-subset filtering from unmapped ledger accounts.
    pub(crate) fn accumulate(&self, raw: &LedgerEntries, out: &mut FsEntries) {
        let mut dropped = 0usize;
        for (account, amount) in raw {
            match self.table.chart_id(account) {
                Some(id) => *out.entry(id.to_string()).or_insert(0) += amount,
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            trace!("dropped {} ledger entries outside the requested accounts", dropped);
        }
    }

    pub(crate) fn reconcile(&self, raw: &LedgerEntries) -> FsEntries {
        let mut out = FsEntries::with_capacity(raw.len());
        self.accumulate(raw, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::datasources::chart_of_accounts_datasource::InMemoryChartOfAccounts,
        domain::logic::index_resolver::IndexResolver,
        entities::{ChartAccount, LedgerAccount},
    };

    async fn table(requested: &[&str]) -> IndexTable {
        let coa = InMemoryChartOfAccounts::new().with_chart(
            "coa",
            vec![
                ChartAccount::new("A", "1", "Cash"),
                ChartAccount::new("B", "2", "Revenue"),
                ChartAccount::new("C", "3", "Expenses"),
            ],
        );
        let ids = requested.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        IndexResolver::new(&coa, "coa").resolve(&ids).await.unwrap()
    }

    fn raw(entries: &[(u32, i64)]) -> LedgerEntries {
        entries
            .iter()
            .map(|(k, v)| (LedgerAccount::new(*k), *v))
            .collect()
    }

    #[tokio::test]
    async fn entries_outside_requested_accounts_are_dropped() {
        let table = table(&["A", "C"]).await;
        let out = EntryReconciler::new(&table).reconcile(&raw(&[(1, 10), (2, 20), (3, -30)]));
        assert_eq!(out.len(), 2);
        assert_eq!(out["A"], 10);
        assert_eq!(out["C"], -30);
    }

    #[tokio::test]
    async fn reserved_index_never_maps() {
        let table = table(&["A", "B", "C"]).await;
        let out = EntryReconciler::new(&table).reconcile(&raw(&[(0, 5), (4, 7)]));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn accumulation_adds_instead_of_overwriting() {
        let table = table(&["A", "B"]).await;
        let reconciler = EntryReconciler::new(&table);
        let mut out = FsEntries::new();
        reconciler.accumulate(&raw(&[(1, 100), (2, -100)]), &mut out);
        reconciler.accumulate(&raw(&[(1, 50), (2, -20)]), &mut out);
        assert_eq!(out["A"], 150);
        assert_eq!(out["B"], -120);
    }
}
