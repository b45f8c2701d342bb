//! Exchange planning types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cambio_shared::types::{AccountId, CategoryId};

use crate::ledger::{CommissionType, ExchangeType};

/// Category name the debit leg is tagged with when it exists.
pub const FROM_CATEGORY_NAME: &str = "Exchanges";
/// Category name the credit leg is tagged with when it exists.
pub const TO_CATEGORY_NAME: &str = "Exchanges Income";
/// Category name the commission record is tagged with when it exists.
pub const COMMISSION_CATEGORY_NAME: &str = "Commissions";

/// A user-supplied exchange request, after account resolution.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    /// Amount leaving the source account, in its currency units.
    pub from_amount: Decimal,
    /// Amount entering the destination account, in its currency units.
    pub to_amount: Decimal,
    /// When the exchange happened.
    pub date: DateTime<Utc>,
    /// Optional description; defaults to
    /// `"Exchange from {from} to {to}"` when absent.
    pub description: Option<String>,
}

/// Categories to auto-tag exchange records with, resolved by exact name.
///
/// Lookups that find nothing leave the corresponding records untagged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeCategories {
    /// Category for the debit leg (`"Exchanges"`).
    pub from_leg: Option<CategoryId>,
    /// Category for the credit leg (`"Exchanges Income"`).
    pub to_leg: Option<CategoryId>,
    /// Category for the commission record (`"Commissions"`).
    pub commission: Option<CategoryId>,
}

/// One planned exchange leg, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeLeg {
    /// Account the leg posts to.
    pub account_id: AccountId,
    /// Signed scaled amount (negative for the debit leg).
    pub amount: i64,
    /// Role and currency relation of this leg.
    pub exchange_type: ExchangeType,
    /// Description shared by both legs.
    pub description: String,
    /// Exchange timestamp.
    pub date: DateTime<Utc>,
    /// Auto-tagged category, when one was found.
    pub category_id: Option<CategoryId>,
}

/// A planned commission record, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRecord {
    /// Account carrying the commission (always the source account).
    pub account_id: AccountId,
    /// Signed scaled amount: negative is a cost, positive a profit.
    pub amount: i64,
    /// Cost or gain classification.
    pub commission_type: CommissionType,
    /// Derived description (`"Commission for {description}"`).
    pub description: String,
    /// Exchange timestamp.
    pub date: DateTime<Utc>,
    /// Auto-tagged category, when one was found.
    pub category_id: Option<CategoryId>,
}

/// The complete multi-record plan for one exchange event.
///
/// Persistence must write all records in one atomic unit and link the legs
/// symmetrically; the plan itself never reaches readers half-applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangePlan {
    /// Debit leg on the source account.
    pub from_leg: ExchangeLeg,
    /// Credit leg on the destination account.
    pub to_leg: ExchangeLeg,
    /// Commission record, only for same-currency exchanges with a
    /// non-zero discrepancy.
    pub commission: Option<CommissionRecord>,
}

impl ExchangePlan {
    /// Accounts whose reports must be recomputed once the plan is persisted.
    #[must_use]
    pub fn affected_accounts(&self) -> [AccountId; 2] {
        [self.from_leg.account_id, self.to_leg.account_id]
    }
}
