use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Account index as stored in the ledger. Index 0 is reserved by the ledger
/// and never carries postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerAccount(pub(crate) u32);

impl LedgerAccount {
    pub const RESERVED: LedgerAccount = LedgerAccount(0);

    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Position of an account inside a chart of accounts (0-based), as returned by
/// the chart repository's index lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartIndex(pub u32);

/// Ledger timestamp identifying a transaction (nanoseconds since the unix
/// epoch, negative before 1970).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Moment(pub i64);

impl Moment {
    /// `None` outside the range representable in nanoseconds (years
    /// 1677..=2262).
    pub fn from_datetime(dt: &DateTime<Utc>) -> Option<Self> {
        dt.timestamp_nanos_opt().map(Moment)
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }
}

impl std::fmt::Display for Moment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calendar date as understood by the ledger (no time-of-day component).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerDate(pub NaiveDate);

impl LedgerDate {
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self(dt.date_naive())
    }

    /// Midnight UTC of the date.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }
}

/// Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: LedgerDate,
    pub end: LedgerDate,
}

impl DateRange {
    pub fn new(start: LedgerDate, end: LedgerDate) -> Self {
        Self { start, end }
    }

    pub fn from_datetimes(from: &DateTime<Utc>, to: &DateTime<Utc>) -> Self {
        Self::new(LedgerDate::from_datetime(from), LedgerDate::from_datetime(to))
    }

    pub fn contains(&self, date: &LedgerDate) -> bool {
        self.start <= *date && *date <= self.end
    }
}

pub type LedgerEntries = HashMap<LedgerAccount, i64>;

#[derive(Debug, Clone)]
pub struct RawLedgerTransaction {
    pub moment: Moment,
    pub date: LedgerDate,
    pub entries: LedgerEntries,
    pub metadata: Vec<u8>,
}
