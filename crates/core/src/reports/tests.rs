//! Unit and property tests for report recomputation.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use crate::ledger::LedgerEntry;

use super::service::ReportService;
use super::types::{AccountReportRow, CurrencyEntry, ReportPeriod};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn entry(day: u32, amount: i64) -> LedgerEntry {
    LedgerEntry::new(Utc.with_ymd_and_hms(2022, 12, day, 0, 0, 0).unwrap(), amount)
}

fn december_window() -> ReportPeriod {
    ReportPeriod::new(date(2022, 12, 2), date(2022, 12, 4))
}

/// A small ledger: one transaction before the window, four inside it.
fn sample_ledger() -> Vec<LedgerEntry> {
    vec![
        entry(1, 6000),
        entry(2, 1064),
        entry(3, 50),
        entry(4, 50),
        entry(4, -50),
    ]
}

#[test]
fn test_account_initial_balance() {
    let totals = ReportService::account_totals(&sample_ledger(), &december_window());
    assert_eq!(totals.initial_balance, 6000);
}

#[test]
fn test_account_end_balance() {
    let totals = ReportService::account_totals(&sample_ledger(), &december_window());
    assert_eq!(totals.end_balance, 7114);
}

#[test]
fn test_account_income_and_expenses() {
    let totals = ReportService::account_totals(&sample_ledger(), &december_window());
    assert_eq!(totals.total_income, 1164);
    assert_eq!(totals.total_expenses, -50);
}

#[test]
fn test_period_window_boundaries_are_inclusive() {
    let entries = vec![
        LedgerEntry::new(
            Utc.with_ymd_and_hms(2022, 12, 2, 0, 0, 0).unwrap(),
            100,
        ),
        LedgerEntry::new(
            Utc.with_ymd_and_hms(2022, 12, 4, 23, 59, 59).unwrap(),
            200,
        ),
        // First instant past the window.
        LedgerEntry::new(Utc.with_ymd_and_hms(2022, 12, 5, 0, 0, 0).unwrap(), 400),
    ];
    let totals = ReportService::account_totals(&entries, &december_window());
    assert_eq!(totals.total_income, 300);
    assert_eq!(totals.end_balance, 300);
}

#[test]
fn test_empty_period_yields_zeros() {
    let totals = ReportService::account_totals(&[], &december_window());
    assert_eq!(totals.initial_balance, 0);
    assert_eq!(totals.end_balance, 0);
    assert_eq!(totals.total_income, 0);
    assert_eq!(totals.total_expenses, 0);
}

#[test]
fn test_recompute_is_idempotent() {
    let ledger = sample_ledger();
    let period = december_window();
    let first = ReportService::account_totals(&ledger, &period);
    let second = ReportService::account_totals(&ledger, &period);
    assert_eq!(first, second);
}

#[test]
fn test_currency_balances_sum_account_reports() {
    let reports = vec![
        AccountReportRow {
            initial_balance: 200_000,
            end_balance: 250_000,
        },
        AccountReportRow {
            initial_balance: 200_000,
            end_balance: 150_000,
        },
    ];
    let totals = ReportService::currency_totals(&reports, &[], &december_window());
    assert_eq!(totals.initial_balance, 400_000);
    assert_eq!(totals.end_balance, 400_000);
}

#[test]
fn test_currency_rollup_excludes_internal_transfers() {
    let window_day = Utc.with_ymd_and_hms(2022, 12, 3, 12, 0, 0).unwrap();
    let entries = vec![
        // Same-currency exchange pair between two of the user's accounts:
        // nets to zero for the currency, must not count.
        CurrencyEntry {
            date: window_day,
            amount: -7500,
            internal_transfer: true,
        },
        CurrencyEntry {
            date: window_day,
            amount: 7500,
            internal_transfer: true,
        },
        // Ordinary transactions of the same magnitude do count.
        CurrencyEntry {
            date: window_day,
            amount: 7500,
            internal_transfer: false,
        },
        CurrencyEntry {
            date: window_day,
            amount: -7500,
            internal_transfer: false,
        },
    ];

    let totals = ReportService::currency_totals(&[], &entries, &december_window());
    assert_eq!(totals.total_income, 7500);
    assert_eq!(totals.total_expenses, -7500);
}

#[test]
fn test_currency_rollup_counts_cross_currency_legs() {
    let window_day = Utc.with_ymd_and_hms(2022, 12, 3, 12, 0, 0).unwrap();
    // A leg converting another currency into this one: real income here.
    let entries = vec![CurrencyEntry {
        date: window_day,
        amount: 125_000,
        internal_transfer: false,
    }];

    let totals = ReportService::currency_totals(&[], &entries, &december_window());
    assert_eq!(totals.total_income, 125_000);
}

#[test]
fn test_currency_rollup_ignores_out_of_window_entries() {
    let entries = vec![CurrencyEntry {
        date: Utc.with_ymd_and_hms(2022, 11, 30, 12, 0, 0).unwrap(),
        amount: 9999,
        internal_transfer: false,
    }];

    let totals = ReportService::currency_totals(&[], &entries, &december_window());
    assert_eq!(totals.total_income, 0);
}

proptest! {
    /// For any ledger dated entirely inside the window, closing minus opening
    /// balance equals income plus expenses.
    #[test]
    fn prop_balance_identity(amounts in proptest::collection::vec(-100_000i64..100_000, 0..50)) {
        let entries: Vec<LedgerEntry> = amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| {
                let day = u32::try_from(i % 28).unwrap() + 1;
                LedgerEntry::new(Utc.with_ymd_and_hms(2022, 12, day, 6, 0, 0).unwrap(), amount)
            })
            .collect();
        let period = ReportPeriod::new(date(2022, 12, 1), date(2022, 12, 31));

        let totals = ReportService::account_totals(&entries, &period);

        prop_assert_eq!(totals.initial_balance, 0);
        prop_assert_eq!(
            totals.end_balance - totals.initial_balance,
            totals.total_income + totals.total_expenses
        );
    }

    /// Entries before the window contribute to both balances but to neither
    /// income nor expenses.
    #[test]
    fn prop_prior_entries_shift_balances_only(prior in -100_000i64..100_000) {
        let mut entries = sample_ledger();
        entries.push(LedgerEntry::new(
            Utc.with_ymd_and_hms(2022, 11, 15, 0, 0, 0).unwrap(),
            prior,
        ));
        let base = ReportService::account_totals(&sample_ledger(), &december_window());
        let shifted = ReportService::account_totals(&entries, &december_window());

        prop_assert_eq!(shifted.initial_balance, base.initial_balance + prior);
        prop_assert_eq!(shifted.end_balance, base.end_balance + prior);
        prop_assert_eq!(shifted.total_income, base.total_income);
        prop_assert_eq!(shifted.total_expenses, base.total_expenses);
    }
}
