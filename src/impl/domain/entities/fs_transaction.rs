use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Amounts keyed by chart account id.
pub type FsEntries = HashMap<String, i64>;

#[derive(Debug, Clone, PartialEq, Eq, serde_derive::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FsTransaction {
    /// Ledger moment of the transaction, in decimal.
    pub id: String,
    pub date: DateTime<Utc>,
    pub entries: FsEntries,
    pub memo: String,
    /// Id of the transaction this one nullifies, empty if none.
    pub removes: String,
    pub created: DateTime<Utc>,
}
