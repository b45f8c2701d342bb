//! Transaction repository for ledger transaction database operations.
//!
//! Covers plain movements, the atomic execution of exchange plans, and the
//! main-currency annotation rules. Every mutation returns the recompute
//! jobs the caller must enqueue; nothing fires implicitly on save.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use cambio_core::conversion::ConversionService;
use cambio_core::exchange::{
    CommissionRecord, ExchangeError, ExchangeLeg, ExchangePlan, ExchangePlanner, ExchangeRequest,
};
use cambio_core::ledger::AccountSnapshot;
use cambio_core::reports::RecomputeJob;
use cambio_shared::types::money::{self, MoneyError};
use cambio_shared::types::{AccountId, CurrencyId};

use crate::entities::{
    accounts, currencies,
    sea_orm_active_enums::{ExchangeType, TransactionKind},
    transactions,
};
use crate::repositories::category::CategoryRepository;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Exchange planning failed.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// Amount could not be encoded at the account's precision.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a plain transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Account the movement posts to.
    pub account_id: Uuid,
    /// Optional category.
    pub category_id: Option<Uuid>,
    /// Signed amount in the account's currency units.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// When the movement happened.
    pub date: DateTime<Utc>,
}

/// Input for updating a transaction. Absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New account.
    pub account_id: Option<Uuid>,
    /// New category (`Some(None)` clears it).
    pub category_id: Option<Option<Uuid>>,
    /// New amount in the (possibly new) account's currency units.
    pub amount: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New timestamp.
    pub date: Option<DateTime<Utc>>,
}

/// Input for creating a currency exchange.
#[derive(Debug, Clone)]
pub struct CreateExchangeInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Source account.
    pub from_account_id: Uuid,
    /// Destination account.
    pub to_account_id: Uuid,
    /// Amount leaving the source account (positive magnitude).
    pub from_amount: Decimal,
    /// Amount entering the destination account (positive magnitude).
    pub to_amount: Decimal,
    /// When the exchange happened.
    pub date: DateTime<Utc>,
    /// Optional description.
    pub description: Option<String>,
}

/// A persisted mutation plus the recompute jobs it requires.
#[derive(Debug, Clone)]
pub struct MutationOutcome<T> {
    /// The persisted record(s).
    pub record: T,
    /// Jobs for the recompute worker, one per affected account.
    pub jobs: Vec<RecomputeJob>,
}

/// Transaction repository for CRUD and exchange execution.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
    main_currency: String,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, main_currency: String) -> Self {
        Self { db, main_currency }
    }

    /// Creates a plain transaction.
    ///
    /// The amount arrives in currency units and is scaled with the
    /// account's precision; the main-currency annotation is resolved from
    /// the rate history at the transaction date.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not resolve; nothing
    /// is written in that case.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<MutationOutcome<transactions::Model>, TransactionError> {
        let model = self.insert_plain(&self.db, &input).await?;
        let jobs = vec![RecomputeJob {
            account_id: AccountId::from_uuid(model.account_id),
        }];
        Ok(MutationOutcome {
            record: model,
            jobs,
        })
    }

    /// Creates a batch of plain transactions in one database transaction.
    ///
    /// The first failing record aborts the whole batch; no partial commit
    /// reaches readers.
    pub async fn create_many(
        &self,
        inputs: Vec<CreateTransactionInput>,
    ) -> Result<MutationOutcome<Vec<transactions::Model>>, TransactionError> {
        let txn = self.db.begin().await?;

        let mut models = Vec::with_capacity(inputs.len());
        for input in &inputs {
            models.push(self.insert_plain(&txn, input).await?);
        }

        txn.commit().await?;

        let mut jobs: Vec<RecomputeJob> = Vec::new();
        for model in &models {
            let job = RecomputeJob {
                account_id: AccountId::from_uuid(model.account_id),
            };
            if !jobs.contains(&job) {
                jobs.push(job);
            }
        }

        Ok(MutationOutcome {
            record: models,
            jobs,
        })
    }

    /// Finds a transaction by id.
    pub async fn find_by_id(
        &self,
        transaction_id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(transaction_id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))
    }

    /// Lists an account's transactions, newest first.
    pub async fn list_for_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .order_by_desc(transactions::Column::Date)
            .all(&self.db)
            .await?)
    }

    /// Updates a transaction.
    ///
    /// Amount, account, and date changes re-resolve the main-currency
    /// annotation so cross-currency figures never go stale: moving the
    /// record onto a main-currency account clears it, any other change
    /// recomputes it from the rate history.
    pub async fn update(
        &self,
        transaction_id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<MutationOutcome<transactions::Model>, TransactionError> {
        let existing = self.find_by_id(transaction_id).await?;
        let previous_account_id = existing.account_id;

        let old_account = self.resolve_account(&self.db, previous_account_id).await?;
        let account_id = input.account_id.unwrap_or(previous_account_id);
        let account = if account_id == previous_account_id {
            old_account.clone()
        } else {
            self.resolve_account(&self.db, account_id).await?
        };

        let date = input.date.unwrap_or_else(|| existing.date.with_timezone(&Utc));
        // Re-derive the decimal value, rescaling stored amounts when only
        // the account (and with it the precision) changed.
        let decimal_amount = match input.amount {
            Some(amount) => amount,
            None => money::unscale(existing.amount, old_account.decimal_places.unsigned_abs()),
        };
        let scaled = money::scale(decimal_amount, account.decimal_places.unsigned_abs())?;
        let to_main = self
            .to_main_currency(&self.db, &account, decimal_amount, date)
            .await?;

        let mut active: transactions::ActiveModel = existing.into();
        active.account_id = Set(account_id);
        active.amount = Set(scaled);
        active.date = Set(date.into());
        active.to_main_currency_amount = Set(to_main);
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&self.db).await?;

        let mut jobs = vec![RecomputeJob {
            account_id: AccountId::from_uuid(previous_account_id),
        }];
        if account_id != previous_account_id {
            jobs.push(RecomputeJob {
                account_id: AccountId::from_uuid(account_id),
            });
        }

        Ok(MutationOutcome {
            record: model,
            jobs,
        })
    }

    /// Deletes a transaction.
    ///
    /// Deleting an exchange leg removes its paired leg and any commission
    /// records referencing either, via the foreign-key cascade rules.
    pub async fn delete(
        &self,
        transaction_id: Uuid,
    ) -> Result<MutationOutcome<()>, TransactionError> {
        let existing = self.find_by_id(transaction_id).await?;

        let mut jobs = vec![RecomputeJob {
            account_id: AccountId::from_uuid(existing.account_id),
        }];
        // The cascade also removes the paired leg, so its account needs a
        // recompute too.
        if let Some(related_id) = existing.related_transaction_id {
            if let Some(related) = transactions::Entity::find_by_id(related_id)
                .one(&self.db)
                .await?
            {
                let job = RecomputeJob {
                    account_id: AccountId::from_uuid(related.account_id),
                };
                if !jobs.contains(&job) {
                    jobs.push(job);
                }
            }
        }

        let active: transactions::ActiveModel = existing.into();
        active.delete(&self.db).await?;

        Ok(MutationOutcome { record: (), jobs })
    }

    /// Creates a currency exchange: two linked legs plus an optional
    /// commission record, written in one database transaction.
    ///
    /// The response preserves the contract order:
    /// `[from_leg, to_leg]` or `[from_leg, to_leg, commission]`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` when either account is missing and
    /// propagates planning failures; in both cases nothing is written.
    pub async fn create_exchange(
        &self,
        input: CreateExchangeInput,
    ) -> Result<MutationOutcome<Vec<transactions::Model>>, TransactionError> {
        let from_account = self.resolve_account(&self.db, input.from_account_id).await?;
        let to_account = self.resolve_account(&self.db, input.to_account_id).await?;

        let categories = CategoryRepository::new(self.db.clone())
            .exchange_categories(input.user_id)
            .await
            .map_err(|error| match error {
                crate::repositories::category::CategoryError::Database(db_err) => {
                    TransactionError::Database(db_err)
                }
                other => TransactionError::Database(DbErr::Custom(other.to_string())),
            })?;

        let request = ExchangeRequest {
            from_amount: input.from_amount,
            to_amount: input.to_amount,
            date: input.date,
            description: input.description,
        };
        let plan = ExchangePlanner::plan(
            &Self::snapshot(&from_account),
            &Self::snapshot(&to_account),
            &request,
            categories,
        )?;

        let records = self.persist_exchange(input.user_id, &plan).await?;

        let jobs = plan
            .affected_accounts()
            .into_iter()
            .map(|account_id| RecomputeJob { account_id })
            .collect();

        Ok(MutationOutcome {
            record: records,
            jobs,
        })
    }

    /// Writes an exchange plan atomically: both legs, the symmetric pair
    /// link, and the commission record when present.
    async fn persist_exchange(
        &self,
        user_id: Uuid,
        plan: &ExchangePlan,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let txn = self.db.begin().await?;
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        let from_leg = Self::leg_active_model(user_id, &plan.from_leg, None, now);
        let from_model = from_leg.insert(&txn).await?;

        let to_leg = Self::leg_active_model(user_id, &plan.to_leg, Some(from_model.id), now);
        let to_model = to_leg.insert(&txn).await?;

        // Close the symmetric link.
        let mut from_active: transactions::ActiveModel = from_model.into();
        from_active.related_transaction_id = Set(Some(to_model.id));
        let from_model = from_active.update(&txn).await?;

        let mut records = vec![from_model.clone(), to_model.clone()];

        if let Some(commission) = &plan.commission {
            let commission_model = Self::commission_active_model(
                user_id,
                commission,
                from_model.id,
                to_model.id,
                now,
            )
            .insert(&txn)
            .await?;
            records.push(commission_model);
        }

        txn.commit().await?;
        Ok(records)
    }

    fn leg_active_model(
        user_id: Uuid,
        leg: &ExchangeLeg,
        related_transaction_id: Option<Uuid>,
        now: sea_orm::prelude::DateTimeWithTimeZone,
    ) -> transactions::ActiveModel {
        transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_id: Set(leg.account_id.into_inner()),
            category_id: Set(leg.category_id.map(cambio_shared::types::CategoryId::into_inner)),
            amount: Set(leg.amount),
            description: Set(leg.description.clone()),
            date: Set(leg.date.into()),
            to_main_currency_amount: Set(None),
            kind: Set(TransactionKind::Exchange),
            exchange_type: Set(Some(ExchangeType::from(leg.exchange_type))),
            related_transaction_id: Set(related_transaction_id),
            exchange_from_id: Set(None),
            exchange_to_id: Set(None),
            commission_type: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    fn commission_active_model(
        user_id: Uuid,
        commission: &CommissionRecord,
        exchange_from_id: Uuid,
        exchange_to_id: Uuid,
        now: sea_orm::prelude::DateTimeWithTimeZone,
    ) -> transactions::ActiveModel {
        transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_id: Set(commission.account_id.into_inner()),
            category_id: Set(commission
                .category_id
                .map(cambio_shared::types::CategoryId::into_inner)),
            amount: Set(commission.amount),
            description: Set(commission.description.clone()),
            date: Set(commission.date.into()),
            to_main_currency_amount: Set(None),
            kind: Set(TransactionKind::Commission),
            exchange_type: Set(None),
            related_transaction_id: Set(None),
            exchange_from_id: Set(Some(exchange_from_id)),
            exchange_to_id: Set(Some(exchange_to_id)),
            commission_type: Set(Some(commission.commission_type.into())),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    /// Inserts one plain transaction on the given connection.
    async fn insert_plain<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: &CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let account = self.resolve_account(conn, input.account_id).await?;
        let scaled = money::scale(input.amount, account.decimal_places.unsigned_abs())?;
        let to_main = self
            .to_main_currency(conn, &account, input.amount, input.date)
            .await?;

        let now = Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            account_id: Set(input.account_id),
            category_id: Set(input.category_id),
            amount: Set(scaled),
            description: Set(input.description.clone()),
            date: Set(input.date.into()),
            to_main_currency_amount: Set(to_main),
            kind: Set(TransactionKind::Plain),
            exchange_type: Set(None),
            related_transaction_id: Set(None),
            exchange_from_id: Set(None),
            exchange_to_id: Set(None),
            commission_type: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(transaction.insert(conn).await?)
    }

    /// Resolves the main-currency annotation for an amount on an account.
    ///
    /// Accounts already denominated in the main currency resolve to `None`,
    /// as do missing rates; a missing rate is never an error.
    async fn to_main_currency<C: ConnectionTrait>(
        &self,
        conn: &C,
        account: &accounts::Model,
        amount: Decimal,
        date: DateTime<Utc>,
    ) -> Result<Option<i64>, TransactionError> {
        let currency = currencies::Entity::find_by_id(account.currency_id)
            .one(conn)
            .await?;
        let Some(currency) = currency else {
            return Ok(None);
        };
        if currency.name == self.main_currency {
            return Ok(None);
        }

        let main = currencies::Entity::find()
            .filter(currencies::Column::Name.eq(&self.main_currency))
            .filter(currencies::Column::UserId.is_null())
            .one(conn)
            .await?;
        let Some(main) = main else {
            return Ok(None);
        };

        let record = crate::entities::conversion_rates::Entity::find()
            .filter(crate::entities::conversion_rates::Column::CurrencyFromId.eq(currency.id))
            .filter(crate::entities::conversion_rates::Column::CurrencyToId.eq(main.id))
            .filter(crate::entities::conversion_rates::Column::Date.lte(date))
            .order_by_desc(crate::entities::conversion_rates::Column::Date)
            .one(conn)
            .await?;

        Ok(record.and_then(|r| ConversionService::to_main_currency_amount(amount, r.rate)))
    }

    async fn resolve_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        account_id: Uuid,
    ) -> Result<accounts::Model, TransactionError> {
        accounts::Entity::find_by_id(account_id)
            .one(conn)
            .await?
            .ok_or(TransactionError::AccountNotFound(account_id))
    }

    fn snapshot(account: &accounts::Model) -> AccountSnapshot {
        AccountSnapshot {
            id: AccountId::from_uuid(account.id),
            name: account.name.clone(),
            currency_id: CurrencyId::from_uuid(account.currency_id),
            decimal_places: account.decimal_places.unsigned_abs(),
        }
    }
}
