use std::collections::HashMap;

use fractic_server_error::ServerError;

use crate::{
    data::datasources::chart_of_accounts_datasource::ChartOfAccounts,
    entities::{ChartIndex, LedgerAccount},
    errors::LedgerIndexOverflow,
};

/// Chart-relative index `i` lives at ledger index `i + 1`; ledger index 0 is
/// reserved. This is the only place that offset is applied.
const LEDGER_INDEX_OFFSET: u32 = 1;

fn to_ledger(index: ChartIndex) -> Result<LedgerAccount, ServerError> {
    index
        .0
        .checked_add(LEDGER_INDEX_OFFSET)
        .map(LedgerAccount)
        .ok_or_else(|| LedgerIndexOverflow::new(index.0))
}

/// Resolved mapping between chart account ids and ledger accounts for one
/// operation.
#[derive(Debug, Default)]
pub(crate) struct IndexTable {
    ledger_accounts: Vec<LedgerAccount>,
    chart_ids: HashMap<LedgerAccount, String>,
}

impl IndexTable {
    fn build(ids: &[String], indexes: Vec<ChartIndex>) -> Result<Self, ServerError> {
        let ledger_accounts = indexes
            .into_iter()
            .map(to_ledger)
            .collect::<Result<Vec<_>, _>>()?;
        let mut chart_ids = HashMap::with_capacity(ids.len());
        for (account, id) in ledger_accounts.iter().zip(ids) {
            // First id wins if the repository maps two ids to one index.
            chart_ids.entry(*account).or_insert_with(|| id.clone());
        }
        Ok(Self {
            ledger_accounts,
            chart_ids,
        })
    }

    /// Ledger accounts in the order the ids were requested.
    pub(crate) fn ledger_accounts(&self) -> &[LedgerAccount] {
        &self.ledger_accounts
    }

    pub(crate) fn chart_id(&self, account: &LedgerAccount) -> Option<&str> {
        self.chart_ids.get(account).map(String::as_str)
    }
}

pub(crate) struct IndexResolver<'a, C: ChartOfAccounts + ?Sized> {
    coa: &'a C,
    coa_id: &'a str,
}

impl<'a, C: ChartOfAccounts + ?Sized> IndexResolver<'a, C> {
    pub(crate) fn new(coa: &'a C, coa_id: &'a str) -> Self {
        Self { coa, coa_id }
    }

    /// Resolves `ids` with a single repository lookup. Lookup errors are
    /// returned as-is.
    pub(crate) async fn resolve(&self, ids: &[String]) -> Result<IndexTable, ServerError> {
        let indexes = self.coa.indexes(self.coa_id, ids, None).await?;
        IndexTable::build(ids, indexes)
    }
}
