//! Conversion-rate history semantics.
//!
//! Rates are append-only: a new quote is a new record, never an update. The
//! engine picks the latest record on or before a reference date, values
//! transactions in the main currency, and condenses recent records into the
//! per-source summary the conversion endpoint serves.

pub mod service;
pub mod types;

pub use service::ConversionService;
pub use types::{ConversionSummary, CurrencySummary, RateRecord, RateSource};
