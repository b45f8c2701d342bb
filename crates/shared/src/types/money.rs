//! Scaled-integer money encoding.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every monetary field is stored and transmitted as an integer equal to
//! `decimal_value * 10^decimal_places`. Summing integers reproduces balances
//! exactly; decimals appear only at the presentation boundary.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Decimal places of the main-currency representation used by
/// `to_main_currency_amount` fields, regardless of the account's own precision.
pub const MAIN_CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Errors produced when encoding a decimal value as a scaled integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The scaled value does not fit in an `i64`.
    #[error("Amount {0} with {1} decimal places overflows the scaled representation")]
    Overflow(Decimal, u32),
}

/// Encodes a decimal amount as a scaled integer.
///
/// Multiplies by `10^decimal_places` and rounds half to even, the same
/// strategy used for currency conversion, so `1.005` at 2 places encodes
/// to `100` rather than `101`.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] when the result does not fit in an `i64`.
pub fn scale(value: Decimal, decimal_places: u32) -> Result<i64, MoneyError> {
    let factor = 10_i64
        .checked_pow(decimal_places)
        .map(Decimal::from)
        .ok_or(MoneyError::Overflow(value, decimal_places))?;
    value
        .checked_mul(factor)
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|scaled| scaled.to_i64())
        .ok_or(MoneyError::Overflow(value, decimal_places))
}

/// Decodes a scaled integer back to its decimal value.
#[must_use]
pub fn unscale(scaled: i64, decimal_places: u32) -> Decimal {
    Decimal::new(scaled, decimal_places)
}

/// Renders a scaled integer with exactly `decimal_places` fractional digits.
///
/// `render(40000, 8)` yields `"0.00040000"`.
#[must_use]
pub fn render(scaled: i64, decimal_places: u32) -> String {
    format!(
        "{:.prec$}",
        unscale(scaled, decimal_places),
        prec = decimal_places as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(50.50), 2, 5050)]
    #[case(dec!(1250), 2, 125000)]
    #[case(dec!(0.0004), 8, 40000)]
    #[case(dec!(-12.34), 2, -1234)]
    #[case(dec!(0), 4, 0)]
    fn scale_known_values(#[case] value: Decimal, #[case] places: u32, #[case] expected: i64) {
        assert_eq!(scale(value, places).unwrap(), expected);
    }

    #[test]
    fn scale_rounds_half_to_even() {
        assert_eq!(scale(dec!(1.005), 2).unwrap(), 100);
        assert_eq!(scale(dec!(1.015), 2).unwrap(), 102);
        assert_eq!(scale(dec!(-1.005), 2).unwrap(), -100);
    }

    #[test]
    fn scale_overflow_is_an_error() {
        let huge = Decimal::MAX;
        assert!(matches!(scale(huge, 8), Err(MoneyError::Overflow(_, 8))));
    }

    #[rstest]
    #[case(5050, 2, "50.50")]
    #[case(40000, 8, "0.00040000")]
    #[case(-1234, 2, "-12.34")]
    #[case(0, 0, "0")]
    #[case(506412, 4, "50.6412")]
    fn render_uses_exact_precision(#[case] scaled: i64, #[case] places: u32, #[case] expected: &str) {
        assert_eq!(render(scaled, places), expected);
    }

    #[test]
    fn unscale_inverts_scale() {
        assert_eq!(unscale(125000, 2), dec!(1250.00));
        assert_eq!(unscale(-5050, 2), dec!(-50.50));
    }

    proptest! {
        /// Any value already representable at `places` decimal digits survives
        /// a scale/render round trip unchanged.
        #[test]
        fn prop_money_round_trip(units in -1_000_000_000i64..1_000_000_000i64, places in 0u32..9) {
            let value = Decimal::new(units, places);
            let scaled = scale(value, places).unwrap();
            prop_assert_eq!(scaled, units);
            let rendered = render(scaled, places);
            prop_assert_eq!(rendered.parse::<Decimal>().unwrap(), value);
        }

        /// Scaled sums are exact: scale distributes over addition for
        /// representable values (no floating-point drift).
        #[test]
        fn prop_scaled_addition_is_exact(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            let x = Decimal::new(a, 2);
            let y = Decimal::new(b, 2);
            prop_assert_eq!(
                scale(x, 2).unwrap() + scale(y, 2).unwrap(),
                scale(x + y, 2).unwrap()
            );
        }
    }
}
