//! Account repository for ledger account database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use cambio_core::conversion::ConversionService;
use cambio_core::ledger::{self, AccountSnapshot, LedgerEntry};
use cambio_shared::types::money;
use cambio_shared::types::{AccountId, CurrencyId};

use crate::entities::{accounts, conversion_rates, currencies, transactions};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Currency not found.
    #[error("Currency not found: {0}")]
    CurrencyNotFound(Uuid),

    /// Accounts are delete-protected while transactions reference them.
    #[error("Cannot delete account: account has {0} transactions")]
    CannotDeleteWithTransactions(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Display name.
    pub name: String,
    /// Currency the account is denominated in.
    pub currency_id: Uuid,
    /// Amount precision; defaults to 2 when absent.
    pub decimal_places: Option<i32>,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Display name.
    pub name: Option<String>,
    /// Currency reference.
    pub currency_id: Option<Uuid>,
}

/// Account with its computed balances for presentation.
#[derive(Debug, Clone)]
pub struct AccountWithBalance {
    /// The account record.
    pub account: accounts::Model,
    /// Current balance, scaled by the account's `decimal_places`.
    pub balance: i64,
    /// Balance rendered with the account's precision.
    pub balance_display: String,
    /// Balance valued in the main currency (2-dp scaled), when a rate exists.
    pub balance_as_main_currency: Option<i64>,
    /// Latest conversion rate to the main currency, when one exists.
    pub latest_conversion_rate_to_main: Option<rust_decimal::Decimal>,
}

/// Account repository for CRUD and balance queries.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
    main_currency: String,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, main_currency: String) -> Self {
        Self { db, main_currency }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency does not exist.
    pub async fn create(&self, input: CreateAccountInput) -> Result<accounts::Model, AccountError> {
        let currency = currencies::Entity::find_by_id(input.currency_id)
            .one(&self.db)
            .await?;
        if currency.is_none() {
            return Err(AccountError::CurrencyNotFound(input.currency_id));
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            name: Set(input.name),
            currency_id: Set(input.currency_id),
            decimal_places: Set(input.decimal_places.unwrap_or(2)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Finds an account by id.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the id does not resolve.
    pub async fn find_by_id(&self, account_id: Uuid) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(account_id))
    }

    /// Lists a user's accounts ordered by name.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// All of a user's accounts denominated in the given currency.
    pub async fn accounts_sharing_currency(
        &self,
        user_id: Uuid,
        currency_id: Uuid,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(accounts::Column::CurrencyId.eq(currency_id))
            .all(&self.db)
            .await?)
    }

    /// Updates an account's name or currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the account or a supplied currency is missing.
    pub async fn update(
        &self,
        account_id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = self.find_by_id(account_id).await?;

        if let Some(currency_id) = input.currency_id {
            let currency = currencies::Entity::find_by_id(currency_id)
                .one(&self.db)
                .await?;
            if currency.is_none() {
                return Err(AccountError::CurrencyNotFound(currency_id));
            }
        }

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(currency_id) = input.currency_id {
            active.currency_id = Set(currency_id);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account.
    ///
    /// Accounts are delete-protected: the delete fails while any
    /// transaction still references the account.
    pub async fn delete(&self, account_id: Uuid) -> Result<(), AccountError> {
        let account = self.find_by_id(account_id).await?;

        let transaction_count = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .count(&self.db)
            .await?;
        if transaction_count > 0 {
            return Err(AccountError::CannotDeleteWithTransactions(transaction_count));
        }

        let active: accounts::ActiveModel = account.into();
        active.delete(&self.db).await?;
        Ok(())
    }

    /// Sums the account's transaction amounts, optionally bounded by date.
    ///
    /// Summing scaled integers reproduces the balance exactly at any
    /// instant; the optional bound is applied by the aggregation itself.
    pub async fn balance(
        &self,
        account_id: Uuid,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<i64, AccountError> {
        let entries = self.ledger_entries(account_id).await?;
        Ok(ledger::balance_of(&entries, as_of))
    }

    /// Loads an account's (date, amount) rows for aggregation.
    pub(crate) async fn ledger_entries(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<LedgerEntry>, AccountError> {
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

    /// Resolves the snapshot the exchange planner works from.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the id does not resolve.
    pub async fn snapshot(&self, account_id: Uuid) -> Result<AccountSnapshot, AccountError> {
        let account = self.find_by_id(account_id).await?;
        Ok(AccountSnapshot {
            id: AccountId::from_uuid(account.id),
            name: account.name,
            currency_id: CurrencyId::from_uuid(account.currency_id),
            decimal_places: account.decimal_places.unsigned_abs(),
        })
    }

    /// Loads an account with its balance, rendered per the money contract,
    /// plus its main-currency valuation when a conversion rate exists.
    pub async fn with_balance(
        &self,
        account_id: Uuid,
    ) -> Result<AccountWithBalance, AccountError> {
        let account = self.find_by_id(account_id).await?;
        let decimal_places = account.decimal_places.unsigned_abs();
        let balance = self.balance(account_id, None).await?;

        let currency = currencies::Entity::find_by_id(account.currency_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::CurrencyNotFound(account.currency_id))?;

        let latest_rate = if currency.name == self.main_currency {
            None
        } else {
            self.latest_rate_to_main(account.currency_id).await?
        };

        let balance_as_main_currency = latest_rate.and_then(|rate| {
            ConversionService::to_main_currency_amount(
                money::unscale(balance, decimal_places),
                rate,
            )
        });

        Ok(AccountWithBalance {
            balance_display: money::render(balance, decimal_places),
            account,
            balance,
            balance_as_main_currency,
            latest_conversion_rate_to_main: latest_rate,
        })
    }

    /// Latest recorded rate from the given currency to the main currency.
    async fn latest_rate_to_main(
        &self,
        currency_id: Uuid,
    ) -> Result<Option<rust_decimal::Decimal>, AccountError> {
        let main = currencies::Entity::find()
            .filter(currencies::Column::Name.eq(&self.main_currency))
            .filter(currencies::Column::UserId.is_null())
            .one(&self.db)
            .await?;
        let Some(main) = main else {
            return Ok(None);
        };

        let record = conversion_rates::Entity::find()
            .filter(conversion_rates::Column::CurrencyFromId.eq(currency_id))
            .filter(conversion_rates::Column::CurrencyToId.eq(main.id))
            .order_by_desc(conversion_rates::Column::Date)
            .one(&self.db)
            .await?;

        Ok(record.map(|r| r.rate))
    }
}
