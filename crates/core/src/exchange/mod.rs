//! Currency-exchange planning.
//!
//! One user-supplied exchange request becomes two mutually linked ledger
//! legs, plus a commission record when a same-currency exchange's magnitudes
//! differ. Planning is pure: the record store resolves accounts up front and
//! persists the resulting [`ExchangePlan`] in a single atomic write.

pub mod error;
pub mod service;
pub mod types;

pub use error::ExchangeError;
pub use service::ExchangePlanner;
pub use types::{
    CommissionRecord, ExchangeCategories, ExchangeLeg, ExchangePlan, ExchangeRequest,
};
