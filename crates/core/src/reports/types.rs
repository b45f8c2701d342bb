//! Report data types.

use cambio_shared::types::AccountId;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// An inclusive report period.
///
/// Boundaries are dates; the transaction window runs from the first
/// microsecond of `from_date` to the last microsecond of `to_date`, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First day of the period.
    pub from_date: NaiveDate,
    /// Last day of the period.
    pub to_date: NaiveDate,
}

impl ReportPeriod {
    /// Creates a new period.
    #[must_use]
    pub const fn new(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self { from_date, to_date }
    }

    /// Start of the window: `from_date` at 00:00:00.000000 UTC.
    #[must_use]
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.from_date.and_time(NaiveTime::MIN).and_utc()
    }

    /// End of the window: `to_date` at 23:59:59.999999 UTC.
    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        let end_of_day = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
            .expect("23:59:59.999999 is a valid time");
        self.to_date.and_time(end_of_day).and_utc()
    }

    /// Whether an instant falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.starts_at() && instant <= self.ends_at()
    }
}

/// Cached totals for one report row.
///
/// All four fields are scaled integers in the account's (or currency's)
/// precision. `total_expenses` is a sum of negative amounts and is itself
/// non-positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    /// Balance at the instant before the window opens.
    pub initial_balance: i64,
    /// Balance at the window's last instant.
    pub end_balance: i64,
    /// Sum of positive amounts inside the window.
    pub total_income: i64,
    /// Sum of negative amounts inside the window.
    pub total_expenses: i64,
}

/// A transaction row as the currency roll-up sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyEntry {
    /// When the movement happened.
    pub date: DateTime<Utc>,
    /// Signed scaled amount.
    pub amount: i64,
    /// True for same-currency exchange legs whose related leg also sits in
    /// an account of this currency: a purely internal transfer.
    pub internal_transfer: bool,
}

/// Balances contributed by one account report to a currency roll-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReportRow {
    /// The account report's initial balance.
    pub initial_balance: i64,
    /// The account report's end balance.
    pub end_balance: i64,
}

/// Message asking the recompute worker to refresh reports for one account
/// (and its currency).
///
/// Mutations return these explicitly; nothing fires on save behind the
/// caller's back. Jobs are idempotent and safe to re-run in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecomputeJob {
    /// Account whose reports must catch up with the ledger.
    pub account_id: AccountId,
}
