//! Report aggregation.
//!
//! Reports are cached period totals, re-derived in full from the ledger on
//! every recompute. Account-level reports sum every transaction; the
//! currency-level roll-up additionally excludes transfers between the user's
//! own same-currency accounts, which net to zero for the currency as a whole.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::{AccountReportRow, CurrencyEntry, RecomputeJob, ReportPeriod, ReportTotals};
