/// Account as seen by financial statement reports.
#[derive(Debug, Clone, PartialEq, Eq, serde_derive::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FsAccount {
    pub id: String,
    pub number: String,
    pub name: String,
    pub summary: bool,
    pub increase_on_debit: bool,
    pub balance_sheet: bool,
    pub income_statement: bool,
    /// Empty when the account belongs to no income statement group.
    pub income_statement_group: String,
}
