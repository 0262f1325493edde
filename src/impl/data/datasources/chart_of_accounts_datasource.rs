use std::collections::HashMap;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    entities::{ChartAccount, ChartIndex},
    errors::{ChartIndexOutOfRange, ChartUnavailable, UnknownChartAccount},
};

fn chart_index(account_id: &str, position: usize) -> Result<ChartIndex, ServerError> {
    u32::try_from(position)
        .map(ChartIndex)
        .map_err(|_| ChartIndexOutOfRange::new(account_id, position))
}

/// Read access to a chart-of-accounts repository.
#[async_trait]
pub trait ChartOfAccounts: Send + Sync {
    async fn all_accounts(&self, coa_id: &str) -> Result<Vec<ChartAccount>, ServerError>;

    async fn get_account(&self, coa_id: &str, id: &str) -> Result<ChartAccount, ServerError>;

    /// Order-preserving lookup of the chart-relative index of each id.
    async fn indexes(
        &self,
        coa_id: &str,
        ids: &[String],
        extra: Option<&serde_json::Value>,
    ) -> Result<Vec<ChartIndex>, ServerError>;
}

/// Chart repository backed by plain vectors. The position of an account in its
/// chart is its chart-relative index.
#[derive(Debug, Default, Clone)]
pub struct InMemoryChartOfAccounts {
    charts: HashMap<String, Vec<ChartAccount>>,
}

impl InMemoryChartOfAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chart(mut self, coa_id: impl Into<String>, accounts: Vec<ChartAccount>) -> Self {
        self.charts.insert(coa_id.into(), accounts);
        self
    }

    fn chart(&self, coa_id: &str) -> Result<&[ChartAccount], ServerError> {
        self.charts
            .get(coa_id)
            .map(Vec::as_slice)
            .ok_or_else(|| ChartUnavailable::new(coa_id))
    }
}

#[async_trait]
impl ChartOfAccounts for InMemoryChartOfAccounts {
    async fn all_accounts(&self, coa_id: &str) -> Result<Vec<ChartAccount>, ServerError> {
        Ok(self.chart(coa_id)?.to_vec())
    }

    async fn get_account(&self, coa_id: &str, id: &str) -> Result<ChartAccount, ServerError> {
        self.chart(coa_id)?
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| UnknownChartAccount::new(coa_id, id))
    }

    async fn indexes(
        &self,
        coa_id: &str,
        ids: &[String],
        _extra: Option<&serde_json::Value>,
    ) -> Result<Vec<ChartIndex>, ServerError> {
        let chart = self.chart(coa_id)?;
        ids.iter()
            .map(|id| {
                let position = chart
                    .iter()
                    .position(|a| &a.id == id)
                    .ok_or_else(|| UnknownChartAccount::new(coa_id, id))?;
                chart_index(id, position)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> InMemoryChartOfAccounts {
        InMemoryChartOfAccounts::new().with_chart(
            "coa",
            vec![
                ChartAccount::new("1000", "1", "Assets"),
                ChartAccount::new("1010", "1.1", "Cash").with_parent("1000"),
                ChartAccount::new("2000", "2", "Liabilities"),
            ],
        )
    }

    #[tokio::test]
    async fn indexes_preserve_request_order() {
        let ids = vec!["2000".to_string(), "1000".to_string()];
        let idxs = chart().indexes("coa", &ids, None).await.unwrap();
        assert_eq!(idxs, vec![ChartIndex(2), ChartIndex(0)]);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn positions_beyond_u32_are_rejected() {
        assert_eq!(chart_index("x", 7).unwrap(), ChartIndex(7));
        assert!(chart_index("x", u32::MAX as usize + 1).is_err());
    }

    #[tokio::test]
    async fn indexes_fail_on_unknown_id() {
        let ids = vec!["1000".to_string(), "9999".to_string()];
        assert!(chart().indexes("coa", &ids, None).await.is_err());
    }

    #[tokio::test]
    async fn unknown_chart_is_an_error() {
        assert!(chart().all_accounts("other").await.is_err());
        assert!(chart().get_account("other", "1000").await.is_err());
    }

    #[tokio::test]
    async fn get_account_returns_stored_record() {
        let a = chart().get_account("coa", "1010").await.unwrap();
        assert_eq!(a.name, "Cash");
        assert_eq!(a.parent, "1000");
    }
}
