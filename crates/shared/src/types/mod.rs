//! Shared domain types.

pub mod id;
pub mod money;

pub use id::{
    AccountId, CategoryId, ConversionRecordId, CurrencyId, ReportAccountId, ReportCurrencyId,
    TransactionId, UserId,
};
pub use money::{MoneyError, MAIN_CURRENCY_DECIMAL_PLACES};
