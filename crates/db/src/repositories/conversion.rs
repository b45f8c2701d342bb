//! Conversion-rate repository for rate history database operations.
//!
//! The history is append-only: recording a fresh quote inserts a new row;
//! nothing is ever updated in place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use cambio_core::conversion::{ConversionService, ConversionSummary, RateRecord};
use cambio_shared::types::CurrencyId;

use crate::entities::{conversion_rates, currencies, sea_orm_active_enums::RateSource};

/// Error types for conversion-rate operations.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Currency not found.
    #[error("Currency not found: {0}")]
    CurrencyNotFound(Uuid),

    /// Rate must be positive.
    #[error("Conversion rate must be positive")]
    NonPositiveRate,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a conversion rate.
#[derive(Debug, Clone)]
pub struct RecordRateInput {
    /// Owning user; `None` for globally visible rates.
    pub user_id: Option<Uuid>,
    /// Source currency.
    pub currency_from_id: Uuid,
    /// Target currency.
    pub currency_to_id: Uuid,
    /// Quote provider.
    pub source: RateSource,
    /// Units of the source currency per unit of the target currency.
    pub rate: Decimal,
    /// Quote timestamp; defaults to now.
    pub date: Option<DateTime<Utc>>,
}

/// Conversion-rate repository.
#[derive(Debug, Clone)]
pub struct ConversionRepository {
    db: DatabaseConnection,
}

impl ConversionRepository {
    /// Creates a new conversion repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends a rate record.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is not positive or either currency is
    /// missing.
    pub async fn record_rate(
        &self,
        input: RecordRateInput,
    ) -> Result<conversion_rates::Model, ConversionError> {
        if input.rate <= Decimal::ZERO {
            return Err(ConversionError::NonPositiveRate);
        }

        for currency_id in [input.currency_from_id, input.currency_to_id] {
            let currency = currencies::Entity::find_by_id(currency_id)
                .one(&self.db)
                .await?;
            if currency.is_none() {
                return Err(ConversionError::CurrencyNotFound(currency_id));
            }
        }

        let now = Utc::now();
        let record = conversion_rates::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            currency_from_id: Set(input.currency_from_id),
            currency_to_id: Set(input.currency_to_id),
            source: Set(input.source),
            rate: Set(input.rate),
            date: Set(input.date.unwrap_or(now).into()),
            created_at: Set(now.into()),
        };

        Ok(record.insert(&self.db).await?)
    }

    /// Most recent rate for the pair dated on or before `as_of`.
    ///
    /// `None` when no record qualifies; a missing rate is never an error.
    pub async fn latest_rate(
        &self,
        currency_from_id: Uuid,
        currency_to_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<Option<conversion_rates::Model>, ConversionError> {
        Ok(conversion_rates::Entity::find()
            .filter(conversion_rates::Column::CurrencyFromId.eq(currency_from_id))
            .filter(conversion_rates::Column::CurrencyToId.eq(currency_to_id))
            .filter(conversion_rates::Column::Date.lte(as_of))
            .order_by_desc(conversion_rates::Column::Date)
            .one(&self.db)
            .await?)
    }

    /// Builds the conversion summary over the currencies visible to the
    /// user: per currency, the latest rate per provider plus the
    /// parallel/official gap. Currencies without rates yield empty
    /// summaries rather than errors.
    pub async fn summary(&self, user_id: Uuid) -> Result<ConversionSummary, ConversionError> {
        let visible = Condition::any()
            .add(currencies::Column::UserId.is_null())
            .add(currencies::Column::UserId.eq(user_id));
        let currency_models = currencies::Entity::find()
            .filter(visible)
            .order_by_asc(currencies::Column::Name)
            .all(&self.db)
            .await?;

        let currency_ids: Vec<Uuid> = currency_models.iter().map(|c| c.id).collect();
        let records = conversion_rates::Entity::find()
            .filter(conversion_rates::Column::CurrencyFromId.is_in(currency_ids))
            .all(&self.db)
            .await?;

        let currencies_for_core: Vec<(CurrencyId, String)> = currency_models
            .iter()
            .map(|c| (CurrencyId::from_uuid(c.id), c.name.clone()))
            .collect();
        let records_for_core: Vec<RateRecord> = records
            .into_iter()
            .map(|record| RateRecord {
                currency_from: CurrencyId::from_uuid(record.currency_from_id),
                currency_to: CurrencyId::from_uuid(record.currency_to_id),
                source: record.source.into(),
                rate: record.rate,
                date: record.date.with_timezone(&Utc),
            })
            .collect();

        Ok(ConversionService::summarize(
            &currencies_for_core,
            &records_for_core,
        ))
    }
}
