//! `SeaORM` entity definitions.

pub mod accounts;
pub mod categories;
pub mod conversion_rates;
pub mod currencies;
pub mod report_accounts;
pub mod report_currencies;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;
