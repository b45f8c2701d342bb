//! Ledger classification types.

use cambio_shared::types::{AccountId, CurrencyId};
use serde::{Deserialize, Serialize};

/// Role and currency relation of an exchange leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeType {
    /// Debit leg of a transfer between accounts of the same currency.
    FromSameCurrency,
    /// Credit leg of a transfer between accounts of the same currency.
    ToSameCurrency,
    /// Debit leg of a conversion into a different currency.
    FromDifferentCurrency,
    /// Credit leg of a conversion into a different currency.
    ToDifferentCurrency,
}

impl ExchangeType {
    /// Returns true for legs of a same-currency transfer.
    #[must_use]
    pub fn is_same_currency(self) -> bool {
        matches!(self, Self::FromSameCurrency | Self::ToSameCurrency)
    }

    /// Returns true for the debit ("from") leg.
    #[must_use]
    pub fn is_from(self) -> bool {
        matches!(self, Self::FromSameCurrency | Self::FromDifferentCurrency)
    }
}

/// Whether an exchange discrepancy cost the user money or earned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    /// The debit exceeded the credit: the difference is a cost.
    Commission,
    /// The credit exceeded the debit: the difference is a gain.
    Profit,
}

/// Snapshot of the account fields the engine needs for planning.
///
/// The record store resolves accounts and hands the engine this minimal view;
/// the engine never reaches back into storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    /// The account ID.
    pub id: AccountId,
    /// Display name, used in generated descriptions.
    pub name: String,
    /// The account's currency.
    pub currency_id: CurrencyId,
    /// Precision used to scale this account's amounts.
    pub decimal_places: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_type_same_currency() {
        assert!(ExchangeType::FromSameCurrency.is_same_currency());
        assert!(ExchangeType::ToSameCurrency.is_same_currency());
        assert!(!ExchangeType::FromDifferentCurrency.is_same_currency());
        assert!(!ExchangeType::ToDifferentCurrency.is_same_currency());
    }

    #[test]
    fn test_exchange_type_direction() {
        assert!(ExchangeType::FromSameCurrency.is_from());
        assert!(ExchangeType::FromDifferentCurrency.is_from());
        assert!(!ExchangeType::ToSameCurrency.is_from());
        assert!(!ExchangeType::ToDifferentCurrency.is_from());
    }
}
