//! `SeaORM` Entity for conversion_rates table.
//!
//! Append-only rate history: a new quote is a new row, never an update.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RateSource;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "conversion_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub currency_from_id: Uuid,
    pub currency_to_id: Uuid,
    pub source: RateSource,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub rate: Decimal,
    pub date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::CurrencyFromId",
        to = "super::currencies::Column::Id"
    )]
    CurrencyFrom,
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::CurrencyToId",
        to = "super::currencies::Column::Id"
    )]
    CurrencyTo,
}

impl ActiveModelBehavior for ActiveModel {}
