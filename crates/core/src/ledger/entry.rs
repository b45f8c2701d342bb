//! Minimal ledger rows for aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dated, scaled amount: the only fields balance and report aggregation
/// ever look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// When the movement happened.
    pub date: DateTime<Utc>,
    /// Signed amount, scaled by the owning account's `decimal_places`.
    pub amount: i64,
}

impl LedgerEntry {
    /// Creates a new entry.
    #[must_use]
    pub const fn new(date: DateTime<Utc>, amount: i64) -> Self {
        Self { date, amount }
    }
}
