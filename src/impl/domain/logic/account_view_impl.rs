use crate::entities::{ChartAccount, FsAccount};

#[derive(Debug, Clone, Copy)]
enum Flag {
    Summary,
    IncreaseOnDebit,
    BalanceSheet,
    IncomeStatement,
}

const FLAG_TAGS: [(&str, Flag); 4] = [
    ("summary", Flag::Summary),
    ("increaseOnDebit", Flag::IncreaseOnDebit),
    ("balanceSheet", Flag::BalanceSheet),
    ("incomeStatement", Flag::IncomeStatement),
];

/// Priority order: an account tagged with several groups reports the first.
const INCOME_STATEMENT_GROUPS: [&str; 7] = [
    "operating",
    "deduction",
    "salesTax",
    "cost",
    "nonOperatingTax",
    "incomeTax",
    "dividends",
];

impl FsAccount {
    fn flag_mut(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::Summary => &mut self.summary,
            Flag::IncreaseOnDebit => &mut self.increase_on_debit,
            Flag::BalanceSheet => &mut self.balance_sheet,
            Flag::IncomeStatement => &mut self.income_statement,
        }
    }
}

impl ChartAccount {
    pub(crate) fn income_statement_group(&self) -> &'static str {
        INCOME_STATEMENT_GROUPS
            .iter()
            .find(|g| self.has_tag(g))
            .copied()
            .unwrap_or("")
    }
}

impl From<&ChartAccount> for FsAccount {
    fn from(a: &ChartAccount) -> Self {
        let mut fs = FsAccount {
            id: a.id.clone(),
            number: a.number.clone(),
            name: a.name.clone(),
            summary: false,
            increase_on_debit: false,
            balance_sheet: false,
            income_statement: false,
            income_statement_group: a.income_statement_group().to_string(),
        };
        for (tag, flag) in FLAG_TAGS {
            *fs.flag_mut(flag) = a.has_tag(tag);
        }
        fs
    }
}
