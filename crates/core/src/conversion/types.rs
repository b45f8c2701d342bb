//! Conversion-rate types.

use std::collections::BTreeMap;

use cambio_shared::types::CurrencyId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a quoted rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// Parallel-market quote.
    Paralelo,
    /// Official central-bank quote.
    Bcv,
    /// Any other provider.
    Other,
}

impl std::fmt::Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paralelo => write!(f, "paralelo"),
            Self::Bcv => write!(f, "bcv"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for RateSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paralelo" => Ok(Self::Paralelo),
            "bcv" => Ok(Self::Bcv),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown rate source: {s}")),
        }
    }
}

/// One historical conversion-rate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// Source currency.
    pub currency_from: CurrencyId,
    /// Target currency (the main currency in practice).
    pub currency_to: CurrencyId,
    /// Quote provider.
    pub source: RateSource,
    /// Units of the source currency per unit of the target currency.
    pub rate: Decimal,
    /// When the quote was recorded.
    pub date: DateTime<Utc>,
}

/// Latest rates for one source currency, keyed by provider label, plus the
/// parallel/official gap when both quotes are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySummary {
    /// Latest rate per provider label.
    pub rates: BTreeMap<String, Decimal>,
    /// Percentage gap of `paralelo` over `bcv`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<Decimal>,
}

/// Conversion summary keyed by source-currency name.
///
/// Currencies without rates map to empty summaries rather than being absent
/// or erroring.
pub type ConversionSummary = BTreeMap<String, CurrencySummary>;
