//! Exchange planning service.
//!
//! Turns one exchange request into 2-3 ledger records: a negative debit
//! leg, a positive credit leg, and (same-currency only) a commission record
//! carrying the discrepancy between the two magnitudes.

use cambio_shared::types::money;
use rust_decimal::Decimal;

use super::error::ExchangeError;
use super::types::{
    CommissionRecord, ExchangeCategories, ExchangeLeg, ExchangePlan, ExchangeRequest,
};
use crate::ledger::{AccountSnapshot, CommissionType, ExchangeType};

/// Exchange planning service.
///
/// Pure business logic: accounts arrive resolved, categories arrive looked
/// up, and the result is a plan the record store persists atomically.
pub struct ExchangePlanner;

impl ExchangePlanner {
    /// Plans the ledger records for one exchange event.
    ///
    /// Amounts are scaled with each account's own precision. For
    /// same-currency exchanges the commission (`from - to`, scaled) is
    /// carried by a separate record and the debit leg stores the
    /// post-commission magnitude `-to`, so the pair nets to the commission
    /// exactly. Different-currency legs keep their requested magnitudes and
    /// never produce a commission.
    ///
    /// # Errors
    ///
    /// Returns an error if either amount is not a positive magnitude or
    /// cannot be encoded at its account's precision.
    pub fn plan(
        from: &AccountSnapshot,
        to: &AccountSnapshot,
        request: &ExchangeRequest,
        categories: ExchangeCategories,
    ) -> Result<ExchangePlan, ExchangeError> {
        if request.from_amount <= Decimal::ZERO || request.to_amount <= Decimal::ZERO {
            return Err(ExchangeError::NonPositiveAmount);
        }

        let from_scaled = money::scale(request.from_amount, from.decimal_places)?;
        let to_scaled = money::scale(request.to_amount, to.decimal_places)?;
        let same_currency = from.currency_id == to.currency_id;

        let description = request.description.clone().unwrap_or_else(|| {
            format!("Exchange from {} to {}", from.name, to.name)
        });

        let from_leg = ExchangeLeg {
            account_id: from.id,
            // Same currency: the commission record carries the discrepancy,
            // so the leg stores the post-commission debit.
            amount: if same_currency { -to_scaled } else { -from_scaled },
            exchange_type: if same_currency {
                ExchangeType::FromSameCurrency
            } else {
                ExchangeType::FromDifferentCurrency
            },
            description: description.clone(),
            date: request.date,
            category_id: categories.from_leg,
        };

        let to_leg = ExchangeLeg {
            account_id: to.id,
            amount: to_scaled,
            exchange_type: if same_currency {
                ExchangeType::ToSameCurrency
            } else {
                ExchangeType::ToDifferentCurrency
            },
            description: description.clone(),
            date: request.date,
            category_id: categories.to_leg,
        };

        let commission = (same_currency && from_scaled != to_scaled).then(|| CommissionRecord {
            account_id: from.id,
            amount: to_scaled - from_scaled,
            commission_type: if from_scaled >= to_scaled {
                CommissionType::Commission
            } else {
                CommissionType::Profit
            },
            description: format!("Commission for {description}"),
            date: request.date,
            category_id: categories.commission,
        });

        Ok(ExchangePlan {
            from_leg,
            to_leg,
            commission,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cambio_shared::types::{AccountId, CategoryId, CurrencyId};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn account(name: &str, currency_id: CurrencyId, decimal_places: u32) -> AccountSnapshot {
        AccountSnapshot {
            id: AccountId::new(),
            name: name.to_string(),
            currency_id,
            decimal_places,
        }
    }

    fn request(from_amount: Decimal, to_amount: Decimal) -> ExchangeRequest {
        ExchangeRequest {
            from_amount,
            to_amount,
            date: Utc.with_ymd_and_hms(2023, 4, 2, 18, 30, 0).unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_different_currency_pairing() {
        let usd = CurrencyId::new();
        let ves = CurrencyId::new();
        let from = account("Cash USD", usd, 2);
        let to = account("Cash VES", ves, 2);

        let plan =
            ExchangePlanner::plan(&from, &to, &request(dec!(50.50), dec!(1250)), Default::default())
                .unwrap();

        assert_eq!(plan.from_leg.amount, -5050);
        assert_eq!(plan.to_leg.amount, 125_000);
        assert_eq!(plan.from_leg.exchange_type, ExchangeType::FromDifferentCurrency);
        assert_eq!(plan.to_leg.exchange_type, ExchangeType::ToDifferentCurrency);
        assert!(plan.commission.is_none());
    }

    #[test]
    fn test_same_currency_commission() {
        let usd = CurrencyId::new();
        let from = account("Bank", usd, 2);
        let to = account("Cash", usd, 2);

        let plan =
            ExchangePlanner::plan(&from, &to, &request(dec!(1250), dec!(1200)), Default::default())
                .unwrap();

        // The leg pair nets to the commission: the debit leg stores the
        // post-commission magnitude.
        assert_eq!(plan.from_leg.amount, -120_000);
        assert_eq!(plan.to_leg.amount, 120_000);
        assert_eq!(plan.from_leg.exchange_type, ExchangeType::FromSameCurrency);
        assert_eq!(plan.to_leg.exchange_type, ExchangeType::ToSameCurrency);

        let commission = plan.commission.unwrap();
        assert_eq!(commission.amount, -5000);
        assert_eq!(commission.commission_type, CommissionType::Commission);
        assert_eq!(commission.account_id, from.id);
    }

    #[test]
    fn test_same_currency_profit() {
        let usd = CurrencyId::new();
        let from = account("Bank", usd, 2);
        let to = account("Cash", usd, 2);

        let plan =
            ExchangePlanner::plan(&from, &to, &request(dec!(1200), dec!(1250)), Default::default())
                .unwrap();

        let commission = plan.commission.unwrap();
        assert_eq!(commission.amount, 5000);
        assert_eq!(commission.commission_type, CommissionType::Profit);
    }

    #[test]
    fn test_same_currency_equal_amounts_has_no_commission() {
        let usd = CurrencyId::new();
        let from = account("Bank", usd, 2);
        let to = account("Cash", usd, 2);

        let plan =
            ExchangePlanner::plan(&from, &to, &request(dec!(75), dec!(75)), Default::default())
                .unwrap();

        assert_eq!(plan.from_leg.amount, -7500);
        assert_eq!(plan.to_leg.amount, 7500);
        assert!(plan.commission.is_none());
    }

    #[test]
    fn test_scaling_uses_each_accounts_precision() {
        let usd = CurrencyId::new();
        let btc = CurrencyId::new();
        let from = account("Checking", usd, 2);
        let to = account("Wallet", btc, 8);

        let plan =
            ExchangePlanner::plan(&from, &to, &request(dec!(25), dec!(0.0004)), Default::default())
                .unwrap();

        assert_eq!(plan.from_leg.amount, -2500);
        assert_eq!(plan.to_leg.amount, 40_000);
    }

    #[test]
    fn test_default_descriptions() {
        let usd = CurrencyId::new();
        let from = account("Bank", usd, 2);
        let to = account("Cash", usd, 2);

        let plan =
            ExchangePlanner::plan(&from, &to, &request(dec!(1250), dec!(1200)), Default::default())
                .unwrap();

        assert_eq!(plan.from_leg.description, "Exchange from Bank to Cash");
        assert_eq!(plan.to_leg.description, "Exchange from Bank to Cash");
        assert_eq!(
            plan.commission.unwrap().description,
            "Commission for Exchange from Bank to Cash"
        );
    }

    #[test]
    fn test_supplied_description_wins() {
        let usd = CurrencyId::new();
        let ves = CurrencyId::new();
        let from = account("Bank", usd, 2);
        let to = account("Cash", ves, 2);

        let mut req = request(dec!(10), dec!(400));
        req.description = Some("Street exchange".to_string());
        let plan = ExchangePlanner::plan(&from, &to, &req, Default::default()).unwrap();

        assert_eq!(plan.from_leg.description, "Street exchange");
    }

    #[test]
    fn test_category_tagging() {
        let usd = CurrencyId::new();
        let from = account("Bank", usd, 2);
        let to = account("Cash", usd, 2);
        let categories = ExchangeCategories {
            from_leg: Some(CategoryId::new()),
            to_leg: Some(CategoryId::new()),
            commission: Some(CategoryId::new()),
        };

        let plan =
            ExchangePlanner::plan(&from, &to, &request(dec!(1250), dec!(1200)), categories)
                .unwrap();

        assert_eq!(plan.from_leg.category_id, categories.from_leg);
        assert_eq!(plan.to_leg.category_id, categories.to_leg);
        assert_eq!(plan.commission.unwrap().category_id, categories.commission);
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        let usd = CurrencyId::new();
        let from = account("Bank", usd, 2);
        let to = account("Cash", usd, 2);

        let negative = ExchangePlanner::plan(
            &from,
            &to,
            &request(dec!(-10), dec!(10)),
            Default::default(),
        );
        assert_eq!(negative, Err(ExchangeError::NonPositiveAmount));

        let zero =
            ExchangePlanner::plan(&from, &to, &request(dec!(10), dec!(0)), Default::default());
        assert_eq!(zero, Err(ExchangeError::NonPositiveAmount));
    }

    #[test]
    fn test_affected_accounts() {
        let usd = CurrencyId::new();
        let ves = CurrencyId::new();
        let from = account("Bank", usd, 2);
        let to = account("Cash", ves, 2);

        let plan =
            ExchangePlanner::plan(&from, &to, &request(dec!(10), dec!(400)), Default::default())
                .unwrap();

        assert_eq!(plan.affected_accounts(), [from.id, to.id]);
    }
}
