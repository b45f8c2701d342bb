//! Database seeder for Cambio development and testing.
//!
//! Seeds a test user, a couple of accounts, and the well-known exchange
//! categories (`Exchanges`, `Exchanges Income`, `Commissions`) that the
//! exchange orchestrator auto-tags records with.
//!
//! Usage: cargo run --bin seeder

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use cambio_db::entities::{
    accounts, categories, currencies, sea_orm_active_enums::CategoryKind, users,
};

/// Test user ID (consistent for all seeds)
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = cambio_shared::AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to database...");
    let db = cambio_db::connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding test user...");
    seed_test_user(&db).await;

    println!("Seeding exchange categories...");
    seed_exchange_categories(&db).await;

    println!("Seeding test accounts...");
    seed_test_accounts(&db).await;

    println!("Seeding complete!");
}

fn test_user_id() -> Uuid {
    Uuid::parse_str(TEST_USER_ID).unwrap()
}

async fn seed_test_user(db: &DatabaseConnection) {
    let existing = users::Entity::find_by_id(test_user_id())
        .one(db)
        .await
        .expect("Failed to query users");
    if existing.is_some() {
        println!("  Test user already exists, skipping");
        return;
    }

    let now = chrono::Utc::now().into();
    let user = users::ActiveModel {
        id: Set(test_user_id()),
        email: Set("test@cambio.dev".to_string()),
        display_name: Set("Test User".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    user.insert(db).await.expect("Failed to create test user");
}

async fn seed_exchange_categories(db: &DatabaseConnection) {
    let seeds = [
        ("Exchanges", "#7c3aed", CategoryKind::Expense),
        ("Exchanges Income", "#16a34a", CategoryKind::Income),
        ("Commissions", "#dc2626", CategoryKind::Expense),
    ];

    for (name, color, kind) in seeds {
        let existing = categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .filter(categories::Column::UserId.is_null())
            .one(db)
            .await
            .expect("Failed to query categories");
        if existing.is_some() {
            println!("  Category '{name}' already exists, skipping");
            continue;
        }

        let now = chrono::Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(None),
            name: Set(name.to_string()),
            color: Set(color.to_string()),
            description: Set(String::new()),
            kind: Set(kind),
            parent_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        category
            .insert(db)
            .await
            .expect("Failed to create category");
    }
}

async fn seed_test_accounts(db: &DatabaseConnection) {
    let seeds = [("Checking USD", "USD", 2), ("Efectivo VES", "VES", 2)];

    for (name, currency_name, decimal_places) in seeds {
        let currency = currencies::Entity::find()
            .filter(currencies::Column::Name.eq(currency_name))
            .filter(currencies::Column::UserId.is_null())
            .one(db)
            .await
            .expect("Failed to query currencies")
            .unwrap_or_else(|| panic!("Global currency {currency_name} must be seeded first"));

        let existing = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(test_user_id()))
            .filter(accounts::Column::Name.eq(name))
            .one(db)
            .await
            .expect("Failed to query accounts");
        if existing.is_some() {
            println!("  Account '{name}' already exists, skipping");
            continue;
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(test_user_id()),
            name: Set(name.to_string()),
            currency_id: Set(currency.id),
            decimal_places: Set(decimal_places),
            created_at: Set(now),
            updated_at: Set(now),
        };
        account.insert(db).await.expect("Failed to create account");
    }
}
