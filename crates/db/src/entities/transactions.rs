//! `SeaORM` Entity for transactions table.
//!
//! One table carries all three record kinds. Exchange legs populate
//! `exchange_type` and `related_transaction_id` (symmetric pair link);
//! commission records populate `commission_type` plus `exchange_from_id` /
//! `exchange_to_id` and are deleted when either leg is.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CommissionType, ExchangeType, TransactionKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    /// Signed amount, scaled by the account's `decimal_places`.
    pub amount: i64,
    pub description: String,
    pub date: DateTimeWithTimeZone,
    /// Value in the main currency at recording time, scaled by 2 decimal
    /// places. Null when the account already uses the main currency or no
    /// conversion rate was available.
    pub to_main_currency_amount: Option<i64>,
    pub kind: TransactionKind,
    pub exchange_type: Option<ExchangeType>,
    pub related_transaction_id: Option<Uuid>,
    pub exchange_from_id: Option<Uuid>,
    pub exchange_to_id: Option<Uuid>,
    pub commission_type: Option<CommissionType>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::RelatedTransactionId",
        to = "Column::Id"
    )]
    RelatedTransaction,
    #[sea_orm(belongs_to = "Entity", from = "Column::ExchangeFromId", to = "Column::Id")]
    ExchangeFrom,
    #[sea_orm(belongs_to = "Entity", from = "Column::ExchangeToId", to = "Column::Id")]
    ExchangeTo,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
