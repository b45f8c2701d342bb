//! Report repository for cached period-report database operations.
//!
//! Rows are keyed by `(user, account|currency, from_date, to_date)` and
//! created through find-or-create only, so duplicates cannot appear through
//! this interface; a periodic dedup sweep remains as a safety net for rows
//! that predate the unique key. Recomputation re-derives totals from the
//! current ledger, which makes every recompute idempotent.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use cambio_core::ledger::LedgerEntry;
use cambio_core::reports::{AccountReportRow, CurrencyEntry, ReportPeriod, ReportService};

use crate::entities::{
    accounts, currencies, report_accounts, report_currencies,
    sea_orm_active_enums::{ExchangeType, TransactionKind},
    transactions,
};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Currency not found.
    #[error("Currency not found: {0}")]
    CurrencyNotFound(Uuid),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Report repository for period reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Account reports
    // ========================================================================

    /// Finds the report row for `(user, account, period)`, creating a zeroed
    /// row when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is inverted or the account is missing.
    pub async fn find_or_create_account_report(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        period: ReportPeriod,
    ) -> Result<report_accounts::Model, ReportError> {
        Self::validate_period(period)?;
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?;
        if account.is_none() {
            return Err(ReportError::AccountNotFound(account_id));
        }

        let existing = report_accounts::Entity::find()
            .filter(report_accounts::Column::UserId.eq(user_id))
            .filter(report_accounts::Column::AccountId.eq(account_id))
            .filter(report_accounts::Column::FromDate.eq(period.from_date))
            .filter(report_accounts::Column::ToDate.eq(period.to_date))
            .one(&self.db)
            .await?;
        if let Some(report) = existing {
            return Ok(report);
        }

        let now = Utc::now().into();
        let report = report_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_id: Set(account_id),
            from_date: Set(period.from_date),
            to_date: Set(period.to_date),
            initial_balance: Set(0),
            end_balance: Set(0),
            total_income: Set(0),
            total_expenses: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(report.insert(&self.db).await?)
    }

    /// Recomputes an account report from the current ledger.
    ///
    /// A period with zero underlying transactions recomputes to all zeros;
    /// it never errors.
    pub async fn recompute_account_report(
        &self,
        report: report_accounts::Model,
    ) -> Result<report_accounts::Model, ReportError> {
        let period = ReportPeriod::new(report.from_date, report.to_date);
        let entries = self.account_entries(report.account_id).await?;
        let totals = ReportService::account_totals(&entries, &period);

        let mut active: report_accounts::ActiveModel = report.into();
        active.initial_balance = Set(totals.initial_balance);
        active.end_balance = Set(totals.end_balance);
        active.total_income = Set(totals.total_income);
        active.total_expenses = Set(totals.total_expenses);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Lists a user's account reports, oldest period first.
    pub async fn list_account_reports(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<report_accounts::Model>, ReportError> {
        Ok(report_accounts::Entity::find()
            .filter(report_accounts::Column::UserId.eq(user_id))
            .order_by_asc(report_accounts::Column::FromDate)
            .all(&self.db)
            .await?)
    }

    // ========================================================================
    // Currency reports
    // ========================================================================

    /// Finds the report row for `(user, currency, period)`, creating a
    /// zeroed row when none exists.
    pub async fn find_or_create_currency_report(
        &self,
        user_id: Uuid,
        currency_id: Uuid,
        period: ReportPeriod,
    ) -> Result<report_currencies::Model, ReportError> {
        Self::validate_period(period)?;
        let currency = currencies::Entity::find_by_id(currency_id)
            .one(&self.db)
            .await?;
        if currency.is_none() {
            return Err(ReportError::CurrencyNotFound(currency_id));
        }

        let existing = report_currencies::Entity::find()
            .filter(report_currencies::Column::UserId.eq(user_id))
            .filter(report_currencies::Column::CurrencyId.eq(currency_id))
            .filter(report_currencies::Column::FromDate.eq(period.from_date))
            .filter(report_currencies::Column::ToDate.eq(period.to_date))
            .one(&self.db)
            .await?;
        if let Some(report) = existing {
            return Ok(report);
        }

        let now = Utc::now().into();
        let report = report_currencies::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            currency_id: Set(currency_id),
            from_date: Set(period.from_date),
            to_date: Set(period.to_date),
            initial_balance: Set(0),
            end_balance: Set(0),
            total_income: Set(0),
            total_expenses: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(report.insert(&self.db).await?)
    }

    /// Recomputes a currency report.
    ///
    /// Balances roll up the account reports sharing the currency and
    /// period; income and expenses re-derive from raw transactions,
    /// excluding same-currency exchange legs whose related leg also sits in
    /// an account of this currency. Legs converting another currency into
    /// (or out of) this one stay counted.
    pub async fn recompute_currency_report(
        &self,
        report: report_currencies::Model,
    ) -> Result<report_currencies::Model, ReportError> {
        let period = ReportPeriod::new(report.from_date, report.to_date);

        let account_ids: Vec<Uuid> = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(report.user_id))
            .filter(accounts::Column::CurrencyId.eq(report.currency_id))
            .select_only()
            .column(accounts::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;

        let account_reports: Vec<AccountReportRow> = report_accounts::Entity::find()
            .filter(report_accounts::Column::UserId.eq(report.user_id))
            .filter(report_accounts::Column::AccountId.is_in(account_ids.clone()))
            .filter(report_accounts::Column::FromDate.eq(period.from_date))
            .filter(report_accounts::Column::ToDate.eq(period.to_date))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| AccountReportRow {
                initial_balance: row.initial_balance,
                end_balance: row.end_balance,
            })
            .collect();

        let window_transactions = transactions::Entity::find()
            .filter(transactions::Column::AccountId.is_in(account_ids))
            .filter(transactions::Column::Date.gte(period.starts_at()))
            .filter(transactions::Column::Date.lte(period.ends_at()))
            .all(&self.db)
            .await?;

        let related_currencies = self
            .related_leg_currencies(&window_transactions)
            .await?;

        let entries: Vec<CurrencyEntry> = window_transactions
            .iter()
            .map(|transaction| CurrencyEntry {
                date: transaction.date.with_timezone(&Utc),
                amount: transaction.amount,
                internal_transfer: Self::is_internal_transfer(
                    transaction,
                    &related_currencies,
                    report.currency_id,
                ),
            })
            .collect();

        let totals = ReportService::currency_totals(&account_reports, &entries, &period);

        let mut active: report_currencies::ActiveModel = report.into();
        active.initial_balance = Set(totals.initial_balance);
        active.end_balance = Set(totals.end_balance);
        active.total_income = Set(totals.total_income);
        active.total_expenses = Set(totals.total_expenses);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Lists a user's currency reports, oldest period first.
    pub async fn list_currency_reports(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<report_currencies::Model>, ReportError> {
        Ok(report_currencies::Entity::find()
            .filter(report_currencies::Column::UserId.eq(user_id))
            .order_by_asc(report_currencies::Column::FromDate)
            .all(&self.db)
            .await?)
    }

    // ========================================================================
    // Recompute entry point & maintenance
    // ========================================================================

    /// Refreshes the most recent report rows touched by a mutation on the
    /// account: the account's own latest report and its currency's latest
    /// report. Accounts with no report rows yet are a no-op.
    ///
    /// Safe to re-run at any time and in any order relative to newer
    /// mutations: totals always re-derive from the current ledger.
    pub async fn recompute_latest_for_account(&self, account_id: Uuid) -> Result<(), ReportError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(ReportError::AccountNotFound(account_id))?;

        let latest_account_report = report_accounts::Entity::find()
            .filter(report_accounts::Column::UserId.eq(account.user_id))
            .filter(report_accounts::Column::AccountId.eq(account.id))
            .order_by_desc(report_accounts::Column::ToDate)
            .one(&self.db)
            .await?;
        if let Some(report) = latest_account_report {
            let _updated = self.recompute_account_report(report).await?;
        }

        let latest_currency_report = report_currencies::Entity::find()
            .filter(report_currencies::Column::UserId.eq(account.user_id))
            .filter(report_currencies::Column::CurrencyId.eq(account.currency_id))
            .order_by_desc(report_currencies::Column::ToDate)
            .one(&self.db)
            .await?;
        if let Some(report) = latest_currency_report {
            let _updated = self.recompute_currency_report(report).await?;
        }

        Ok(())
    }

    /// Safety-net sweep removing duplicate report rows for the same
    /// `(user, account|currency, period)` key, keeping one arbitrary
    /// survivor per key. Returns the number of rows deleted.
    pub async fn delete_duplicate_reports(&self, user_id: Uuid) -> Result<u64, ReportError> {
        let mut deleted = 0_u64;

        let mut seen_account_keys = HashSet::new();
        for report in self.list_account_reports(user_id).await? {
            let key = (report.account_id, report.from_date, report.to_date);
            if seen_account_keys.insert(key) {
                continue;
            }
            let active: report_accounts::ActiveModel = report.into();
            active.delete(&self.db).await?;
            deleted += 1;
        }

        let mut seen_currency_keys = HashSet::new();
        for report in self.list_currency_reports(user_id).await? {
            let key = (report.currency_id, report.from_date, report.to_date);
            if seen_currency_keys.insert(key) {
                continue;
            }
            let active: report_currencies::ActiveModel = report.into();
            active.delete(&self.db).await?;
            deleted += 1;
        }

        Ok(deleted)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn validate_period(period: ReportPeriod) -> Result<(), ReportError> {
        if period.from_date > period.to_date {
            return Err(ReportError::InvalidDateRange {
                start: period.from_date,
                end: period.to_date,
            });
        }
        Ok(())
    }

    async fn account_entries(&self, account_id: Uuid) -> Result<Vec<LedgerEntry>, ReportError> {
        let rows: Vec<(chrono::DateTime<chrono::FixedOffset>, i64)> = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .select_only()
            .column(transactions::Column::Date)
            .column(transactions::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(date, amount)| LedgerEntry::new(date.with_timezone(&Utc), amount))
            .collect())
    }

    /// Maps related-leg transaction ids to the currency of the account they
    /// post to, for the internal-transfer exclusion.
    async fn related_leg_currencies(
        &self,
        window_transactions: &[transactions::Model],
    ) -> Result<HashMap<Uuid, Uuid>, ReportError> {
        let related_ids: Vec<Uuid> = window_transactions
            .iter()
            .filter_map(|t| t.related_transaction_id)
            .collect();
        if related_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let related_rows: Vec<(Uuid, Uuid)> = transactions::Entity::find()
            .filter(transactions::Column::Id.is_in(related_ids))
            .select_only()
            .column(transactions::Column::Id)
            .column(transactions::Column::AccountId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let account_ids: Vec<Uuid> = related_rows.iter().map(|(_, account_id)| *account_id).collect();
        let account_rows: Vec<(Uuid, Uuid)> = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .select_only()
            .column(accounts::Column::Id)
            .column(accounts::Column::CurrencyId)
            .into_tuple()
            .all(&self.db)
            .await?;
        let account_currencies: HashMap<Uuid, Uuid> = account_rows.into_iter().collect();

        Ok(related_rows
            .into_iter()
            .filter_map(|(transaction_id, account_id)| {
                account_currencies
                    .get(&account_id)
                    .map(|currency_id| (transaction_id, *currency_id))
            })
            .collect())
    }

    /// A transaction is an internal transfer for the report currency when it
    /// is a same-currency exchange leg whose related leg also sits in an
    /// account of that currency.
    fn is_internal_transfer(
        transaction: &transactions::Model,
        related_currencies: &HashMap<Uuid, Uuid>,
        currency_id: Uuid,
    ) -> bool {
        if transaction.kind != TransactionKind::Exchange {
            return false;
        }
        let same_currency_leg = transaction
            .exchange_type
            .as_ref()
            .is_some_and(ExchangeType::is_same_currency);
        if !same_currency_leg {
            return false;
        }
        transaction
            .related_transaction_id
            .and_then(|related_id| related_currencies.get(&related_id))
            .is_some_and(|related_currency| *related_currency == currency_id)
    }
}
