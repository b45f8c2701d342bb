//! Account balance aggregation.
//!
//! Amounts are scaled integers, so summing every transaction reproduces the
//! account's balance exactly at any instant. No floating-point drift.

use chrono::{DateTime, Utc};

use super::entry::LedgerEntry;

/// Sums transaction amounts for an account, optionally bounded by date
/// (inclusive).
#[must_use]
pub fn balance_of<'a, I>(entries: I, as_of: Option<DateTime<Utc>>) -> i64
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    entries
        .into_iter()
        .filter(|entry| as_of.is_none_or(|bound| entry.date <= bound))
        .map(|entry| entry.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(day: u32, amount: i64) -> LedgerEntry {
        LedgerEntry::new(Utc.with_ymd_and_hms(2022, 12, day, 12, 0, 0).unwrap(), amount)
    }

    #[test]
    fn test_balance_sums_all_entries() {
        let entries = vec![entry(1, 6000), entry(2, 1064), entry(3, 50), entry(4, -50)];
        assert_eq!(balance_of(&entries, None), 7064);
    }

    #[test]
    fn test_balance_bounded_by_date() {
        let entries = vec![entry(1, 6000), entry(2, 1064), entry(3, 50)];
        let bound = Utc.with_ymd_and_hms(2022, 12, 2, 23, 59, 59).unwrap();
        assert_eq!(balance_of(&entries, Some(bound)), 7064);
    }

    #[test]
    fn test_balance_bound_is_inclusive() {
        let entries = vec![entry(2, 1064)];
        let exact = entries[0].date;
        assert_eq!(balance_of(&entries, Some(exact)), 1064);
    }

    #[test]
    fn test_empty_ledger_is_zero() {
        assert_eq!(balance_of(&[], None), 0);
    }
}
