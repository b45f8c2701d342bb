//! Conversion-rate selection and main-currency valuation.

use std::collections::BTreeMap;

use cambio_shared::types::money::MAIN_CURRENCY_DECIMAL_PLACES;
use cambio_shared::types::CurrencyId;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{ConversionSummary, CurrencySummary, RateRecord, RateSource};

/// Rate-history queries and derived figures.
pub struct ConversionService;

impl ConversionService {
    /// Picks the most recent record for the currency pair dated on or before
    /// `as_of`. Returns `None` when no record qualifies; a missing rate is
    /// never an error.
    #[must_use]
    pub fn latest_rate<'a, I>(
        records: I,
        currency_from: CurrencyId,
        currency_to: CurrencyId,
        as_of: DateTime<Utc>,
    ) -> Option<&'a RateRecord>
    where
        I: IntoIterator<Item = &'a RateRecord>,
    {
        records
            .into_iter()
            .filter(|record| {
                record.currency_from == currency_from
                    && record.currency_to == currency_to
                    && record.date <= as_of
            })
            .max_by_key(|record| record.date)
    }

    /// Values a transaction amount in the main currency.
    ///
    /// The amount is normalized to the main currency's two decimal places
    /// before dividing by the rate; the result is a 2-dp scaled integer
    /// rounded half to even. Non-positive rates yield `None`.
    #[must_use]
    pub fn to_main_currency_amount(amount: Decimal, rate: Decimal) -> Option<i64> {
        if rate <= Decimal::ZERO {
            return None;
        }
        let factor = Decimal::from(10_i64.pow(MAIN_CURRENCY_DECIMAL_PLACES));
        amount
            .checked_mul(factor)?
            .checked_div(rate)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
    }

    /// Percentage by which the parallel quote exceeds the official one,
    /// rounded to two decimal places. `None` when the official quote is
    /// missing or zero.
    #[must_use]
    pub fn gap(paralelo: Decimal, bcv: Decimal) -> Option<Decimal> {
        if bcv.is_zero() {
            return None;
        }
        Some(
            ((paralelo - bcv) / bcv * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Builds the conversion summary for the given currencies.
    ///
    /// Each currency maps to its latest rate per provider; currencies with
    /// no records map to empty summaries. The gap is derived only when both
    /// the `paralelo` and `bcv` quotes are present.
    #[must_use]
    pub fn summarize(
        currencies: &[(CurrencyId, String)],
        records: &[RateRecord],
    ) -> ConversionSummary {
        let mut summary = ConversionSummary::new();

        for (currency_id, name) in currencies {
            let mut latest: BTreeMap<RateSource, &RateRecord> = BTreeMap::new();
            for record in records.iter().filter(|r| r.currency_from == *currency_id) {
                let slot = latest.entry(record.source).or_insert(record);
                if record.date > slot.date {
                    *slot = record;
                }
            }

            let rates: BTreeMap<String, Decimal> = latest
                .iter()
                .map(|(source, record)| (source.to_string(), record.rate))
                .collect();

            let gap = match (
                latest.get(&RateSource::Paralelo),
                latest.get(&RateSource::Bcv),
            ) {
                (Some(paralelo), Some(bcv)) => Self::gap(paralelo.rate, bcv.rate),
                _ => None,
            };

            summary.insert(name.clone(), CurrencySummary { rates, gap });
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn record(
        currency_from: CurrencyId,
        currency_to: CurrencyId,
        source: RateSource,
        rate: Decimal,
        day: u32,
    ) -> RateRecord {
        RateRecord {
            currency_from,
            currency_to,
            source,
            rate,
            date: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_latest_rate_picks_most_recent_on_or_before() {
        let ves = CurrencyId::new();
        let usd = CurrencyId::new();
        let records = vec![
            record(ves, usd, RateSource::Paralelo, dec!(36.5), 1),
            record(ves, usd, RateSource::Paralelo, dec!(38.2), 10),
            record(ves, usd, RateSource::Paralelo, dec!(40.0), 20),
        ];

        let as_of = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let found = ConversionService::latest_rate(&records, ves, usd, as_of).unwrap();
        assert_eq!(found.rate, dec!(38.2));
    }

    #[test]
    fn test_latest_rate_none_without_records() {
        let ves = CurrencyId::new();
        let usd = CurrencyId::new();
        let as_of = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        assert!(ConversionService::latest_rate(&[], ves, usd, as_of).is_none());
    }

    #[test]
    fn test_latest_rate_ignores_other_pairs() {
        let ves = CurrencyId::new();
        let usd = CurrencyId::new();
        let eur = CurrencyId::new();
        let records = vec![record(ves, eur, RateSource::Bcv, dec!(39.9), 1)];

        let as_of = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        assert!(ConversionService::latest_rate(&records, ves, usd, as_of).is_none());
    }

    #[test]
    fn test_to_main_currency_amount_rounds() {
        // 1000.00 VES at 36.5 VES/USD -> 27.40 USD -> 2740
        assert_eq!(
            ConversionService::to_main_currency_amount(dec!(1000), dec!(36.5)),
            Some(2740)
        );
        // 4-dp account amounts normalize to 2 dp first
        assert_eq!(
            ConversionService::to_main_currency_amount(dec!(50.6412), dec!(2)),
            Some(2532)
        );
    }

    #[test]
    fn test_to_main_currency_amount_rejects_bad_rates() {
        assert_eq!(
            ConversionService::to_main_currency_amount(dec!(100), Decimal::ZERO),
            None
        );
        assert_eq!(
            ConversionService::to_main_currency_amount(dec!(100), dec!(-3)),
            None
        );
    }

    #[rstest]
    #[case(dec!(40), dec!(36.5), Some(dec!(9.59)))]
    #[case(dec!(36.5), dec!(36.5), Some(dec!(0.00)))]
    #[case(dec!(30), dec!(40), Some(dec!(-25.00)))]
    #[case(dec!(40), Decimal::ZERO, None)]
    fn test_gap_percentage(
        #[case] paralelo: Decimal,
        #[case] bcv: Decimal,
        #[case] expected: Option<Decimal>,
    ) {
        assert_eq!(ConversionService::gap(paralelo, bcv), expected);
    }

    #[test]
    fn test_summary_shape() {
        let ves = CurrencyId::new();
        let usd = CurrencyId::new();
        let currencies = vec![(ves, "VES".to_string()), (usd, "USD".to_string())];
        let records = vec![
            record(ves, usd, RateSource::Paralelo, dec!(36.5), 1),
            record(ves, usd, RateSource::Paralelo, dec!(40.0), 20),
            record(ves, usd, RateSource::Bcv, dec!(36.5), 20),
        ];

        let summary = ConversionService::summarize(&currencies, &records);

        let ves_summary = &summary["VES"];
        assert_eq!(ves_summary.rates["paralelo"], dec!(40.0));
        assert_eq!(ves_summary.rates["bcv"], dec!(36.5));
        assert_eq!(ves_summary.gap, Some(dec!(9.59)));

        // Currencies without rates yield empty summaries, not errors.
        let usd_summary = &summary["USD"];
        assert!(usd_summary.rates.is_empty());
        assert!(usd_summary.gap.is_none());
    }

    #[test]
    fn test_summary_serializes_as_nested_objects() {
        let ves = CurrencyId::new();
        let usd = CurrencyId::new();
        let currencies = vec![(ves, "VES".to_string()), (usd, "USD".to_string())];
        let records = vec![record(ves, usd, RateSource::Bcv, dec!(36.5), 20)];

        let summary = ConversionService::summarize(&currencies, &records);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["VES"]["rates"]["bcv"], serde_json::json!("36.5"));
        assert!(json["VES"].get("gap").is_none());
        // Absent rates serialize as an empty object, not an error or null.
        assert_eq!(json["USD"]["rates"], serde_json::json!({}));
    }
}
