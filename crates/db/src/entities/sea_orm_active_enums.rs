//! `SeaORM` active enums mapped to PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Classification of a ledger transaction record.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Ordinary movement.
    #[sea_orm(string_value = "plain")]
    Plain,
    /// One leg of a currency exchange.
    #[sea_orm(string_value = "exchange")]
    Exchange,
    /// Commission or profit derived from an exchange.
    #[sea_orm(string_value = "commission")]
    Commission,
}

/// Role and currency relation of an exchange leg.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "exchange_type")]
#[serde(rename_all = "snake_case")]
pub enum ExchangeType {
    /// Debit leg, same currency on both sides.
    #[sea_orm(string_value = "from_same_currency")]
    FromSameCurrency,
    /// Credit leg, same currency on both sides.
    #[sea_orm(string_value = "to_same_currency")]
    ToSameCurrency,
    /// Debit leg of a cross-currency conversion.
    #[sea_orm(string_value = "from_different_currency")]
    FromDifferentCurrency,
    /// Credit leg of a cross-currency conversion.
    #[sea_orm(string_value = "to_different_currency")]
    ToDifferentCurrency,
}

/// Cost or gain classification of a commission record.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "commission_type")]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    /// The discrepancy is a cost.
    #[sea_orm(string_value = "commission")]
    Commission,
    /// The discrepancy is a gain.
    #[sea_orm(string_value = "profit")]
    Profit,
}

/// Category classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_kind")]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Expense category.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Income category.
    #[sea_orm(string_value = "income")]
    Income,
}

/// Provider of a conversion-rate quote.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "rate_source")]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// Parallel-market quote.
    #[sea_orm(string_value = "paralelo")]
    Paralelo,
    /// Official central-bank quote.
    #[sea_orm(string_value = "bcv")]
    Bcv,
    /// Any other provider.
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<cambio_core::ledger::ExchangeType> for ExchangeType {
    fn from(exchange_type: cambio_core::ledger::ExchangeType) -> Self {
        match exchange_type {
            cambio_core::ledger::ExchangeType::FromSameCurrency => Self::FromSameCurrency,
            cambio_core::ledger::ExchangeType::ToSameCurrency => Self::ToSameCurrency,
            cambio_core::ledger::ExchangeType::FromDifferentCurrency => Self::FromDifferentCurrency,
            cambio_core::ledger::ExchangeType::ToDifferentCurrency => Self::ToDifferentCurrency,
        }
    }
}

impl ExchangeType {
    /// Returns true for legs of a same-currency transfer.
    #[must_use]
    pub fn is_same_currency(&self) -> bool {
        matches!(self, Self::FromSameCurrency | Self::ToSameCurrency)
    }
}

impl From<cambio_core::ledger::CommissionType> for CommissionType {
    fn from(commission_type: cambio_core::ledger::CommissionType) -> Self {
        match commission_type {
            cambio_core::ledger::CommissionType::Commission => Self::Commission,
            cambio_core::ledger::CommissionType::Profit => Self::Profit,
        }
    }
}

impl From<RateSource> for cambio_core::conversion::RateSource {
    fn from(source: RateSource) -> Self {
        match source {
            RateSource::Paralelo => Self::Paralelo,
            RateSource::Bcv => Self::Bcv,
            RateSource::Other => Self::Other,
        }
    }
}
