//! Ledger domain types and balance aggregation.
//!
//! A ledger transaction is a single record carrying a tagged kind: a plain
//! movement, one leg of a currency exchange, or the commission derived from
//! an exchange. Kind-specific fields (pair link, leg references) are optional
//! columns on the same record rather than separate entities.

pub mod balance;
pub mod entry;
pub mod types;

pub use balance::balance_of;
pub use entry::LedgerEntry;
pub use types::{AccountSnapshot, CommissionType, ExchangeType};
