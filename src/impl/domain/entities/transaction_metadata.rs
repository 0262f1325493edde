use super::ledger::Moment;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionMetadata {
    pub memo: String,
    pub removes: Option<Moment>,
}

impl TransactionMetadata {
    pub fn new(memo: impl Into<String>) -> Self {
        Self {
            memo: memo.into(),
            removes: None,
        }
    }

    pub fn removing(memo: impl Into<String>, removes: Moment) -> Self {
        Self {
            memo: memo.into(),
            removes: Some(removes),
        }
    }
}
