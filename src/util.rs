use std::sync::Arc;

use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;

use crate::{
    config::DataSourceConfig,
    datasources::{ChartOfAccounts, LedgerSpace},
    domain::usecases::{
        projection_usecase::{ProjectionUsecase as _, ProjectionUsecaseImpl},
        transaction_stream::TransactionStream,
    },
    entities::{FsAccount, FsEntries},
};

/// Financial statement view of a ledger, keyed by the accounts of one chart.
pub struct FinancialStatementsDataSource<S, C>
where
    S: LedgerSpace + 'static,
    C: ChartOfAccounts + 'static,
{
    projection_usecase: ProjectionUsecaseImpl<S, C>,
}

impl<S, C> FinancialStatementsDataSource<S, C>
where
    S: LedgerSpace + 'static,
    C: ChartOfAccounts + 'static,
{
    pub fn new(space: Arc<S>, coa: Arc<C>, config: DataSourceConfig) -> Result<Self, ServerError> {
        config.validate()?;
        Ok(Self {
            projection_usecase: ProjectionUsecaseImpl::new(
                space,
                coa,
                config.coa_id,
                config.channel_capacity,
            ),
        })
    }

    /// Streams the transactions dated in `[from, to]` that post to any of
    /// `account_ids`, in ledger order. Must be called within a Tokio runtime.
    pub fn transactions(
        &self,
        account_ids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TransactionStream {
        self.projection_usecase.transactions(account_ids, from, to)
    }

    /// Net amount per account over `[from, to]`.
    pub async fn balances(
        &self,
        account_ids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<FsEntries, ServerError> {
        self.projection_usecase.balances(account_ids, from, to).await
    }

    pub async fn accounts(&self) -> Result<Vec<FsAccount>, ServerError> {
        self.projection_usecase.accounts().await
    }

    pub async fn account(&self, id: &str) -> Result<FsAccount, ServerError> {
        self.projection_usecase.account(id).await
    }

    /// False when `child` does not exist.
    pub async fn is_parent(&self, parent: &str, child: &str) -> bool {
        self.projection_usecase.is_parent(parent, child).await
    }
}
