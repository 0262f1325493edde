use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;
use futures::{StreamExt as _, TryStreamExt as _};
use log::{debug, warn};

use crate::{
    data::{
        datasources::{
            chart_of_accounts_datasource::ChartOfAccounts, ledger_space_datasource::LedgerSpace,
        },
        models::transaction_metadata_model::decode_metadata,
    },
    domain::logic::{entry_reconciler::EntryReconciler, index_resolver::IndexResolver},
    entities::{DateRange, FsAccount, FsEntries, FsTransaction, RawLedgerTransaction},
    errors::StreamCancelled,
};

use super::transaction_stream::{TransactionSink, TransactionStream};

#[async_trait]
pub trait ProjectionUsecase: Send + Sync {
    /// Must be called from within a Tokio runtime; the producer runs as a
    /// spawned task.
    fn transactions(
        &self,
        account_ids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TransactionStream;

    async fn balances(
        &self,
        account_ids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<FsEntries, ServerError>;

    async fn accounts(&self) -> Result<Vec<FsAccount>, ServerError>;

    async fn account(&self, id: &str) -> Result<FsAccount, ServerError>;

    async fn is_parent(&self, parent: &str, child: &str) -> bool;
}

pub(crate) struct ProjectionUsecaseImpl<S, C>
where
    S: LedgerSpace + 'static,
    C: ChartOfAccounts + 'static,
{
    space: Arc<S>,
    coa: Arc<C>,
    coa_id: String,
    channel_capacity: usize,
}

impl<S, C> ProjectionUsecaseImpl<S, C>
where
    S: LedgerSpace + 'static,
    C: ChartOfAccounts + 'static,
{
    pub(crate) fn new(space: Arc<S>, coa: Arc<C>, coa_id: String, channel_capacity: usize) -> Self {
        Self {
            space,
            coa,
            coa_id,
            channel_capacity,
        }
    }
}

#[async_trait]
impl<S, C> ProjectionUsecase for ProjectionUsecaseImpl<S, C>
where
    S: LedgerSpace + 'static,
    C: ChartOfAccounts + 'static,
{
    fn transactions(
        &self,
        account_ids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TransactionStream {
        let (sink, stream) = TransactionStream::channel(self.channel_capacity);
        let producer = TransactionProducer {
            space: self.space.clone(),
            coa: self.coa.clone(),
            coa_id: self.coa_id.clone(),
            account_ids: account_ids.to_vec(),
            range: DateRange::from_datetimes(&from, &to),
        };
        debug!(
            "streaming transactions for {} accounts of '{}' ({:?})",
            account_ids.len(),
            self.coa_id,
            producer.range
        );
        tokio::spawn(producer.run(sink));
        stream
    }

    async fn balances(
        &self,
        account_ids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<FsEntries, ServerError> {
        let range = DateRange::from_datetimes(&from, &to);
        debug!(
            "aggregating balances for {} accounts of '{}' ({:?})",
            account_ids.len(),
            self.coa_id,
            range
        );
        let table = IndexResolver::new(self.coa.as_ref(), &self.coa_id)
            .resolve(account_ids)
            .await?;
        let mut projected = self
            .space
            .projection(table.ledger_accounts(), &[range], None)
            .await?;
        let reconciler = EntryReconciler::new(&table);
        let mut result = FsEntries::new();
        while let Some(entries) = projected.try_next().await? {
            reconciler.accumulate(&entries, &mut result);
        }
        Ok(result)
    }

    async fn accounts(&self) -> Result<Vec<FsAccount>, ServerError> {
        Ok(self
            .coa
            .all_accounts(&self.coa_id)
            .await?
            .iter()
            .map(FsAccount::from)
            .collect())
    }

    async fn account(&self, id: &str) -> Result<FsAccount, ServerError> {
        let a = self.coa.get_account(&self.coa_id, id).await?;
        Ok(FsAccount::from(&a))
    }

    async fn is_parent(&self, parent: &str, child: &str) -> bool {
        match self.coa.get_account(&self.coa_id, child).await {
            Ok(c) => c.parent == parent,
            Err(e) => {
                debug!("is_parent: child '{}' not found: {:?}", child, e);
                false
            }
        }
    }
}

struct TransactionProducer<S, C> {
    space: Arc<S>,
    coa: Arc<C>,
    coa_id: String,
    account_ids: Vec<String>,
    range: DateRange,
}

impl<S, C> TransactionProducer<S, C>
where
    S: LedgerSpace + 'static,
    C: ChartOfAccounts + 'static,
{
    async fn run(self, sink: TransactionSink) {
        let TransactionSink {
            transactions,
            result,
            cancel,
        } = sink;
        // The data sender lives inside the produce future, so the channel is
        // closed before the terminal result is sent.
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StreamCancelled::new()),
            r = self.produce(transactions) => r,
        };
        match &outcome {
            Ok(()) => debug!("transaction stream for '{}' completed", self.coa_id),
            Err(e) if cancel.is_cancelled() => {
                debug!("transaction stream for '{}' cancelled: {:?}", self.coa_id, e)
            }
            Err(e) => warn!("transaction stream for '{}' failed: {:?}", self.coa_id, e),
        }
        // Nobody is listening if the stream was dropped.
        let _ = result.send(outcome);
    }

    async fn produce(
        &self,
        transactions: tokio::sync::mpsc::Sender<FsTransaction>,
    ) -> Result<(), ServerError> {
        let table = IndexResolver::new(self.coa.as_ref(), &self.coa_id)
            .resolve(&self.account_ids)
            .await?;
        let mut raw = self
            .space
            .slice(table.ledger_accounts(), &[self.range], None)
            .await?;
        let reconciler = EntryReconciler::new(&table);
        while let Some(t) = raw.next().await {
            let fs = project_transaction(&reconciler, t?)?;
            transactions
                .send(fs)
                .await
                .map_err(|_| StreamCancelled::new())?;
        }
        Ok(())
    }
}

fn project_transaction(
    reconciler: &EntryReconciler<'_>,
    t: RawLedgerTransaction,
) -> Result<FsTransaction, ServerError> {
    let metadata = decode_metadata(t.moment, &t.metadata)?;
    Ok(FsTransaction {
        id: t.moment.to_string(),
        date: t.date.to_datetime(),
        entries: reconciler.reconcile(&t.entries),
        memo: metadata.memo,
        removes: metadata
            .removes
            .map(|m| m.to_string())
            .unwrap_or_default(),
        created: t.moment.to_datetime(),
    })
}
