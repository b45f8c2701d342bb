//! Initial database migration.
//!
//! Creates enums, core tables, foreign keys, indexes, and the global
//! currency seeds.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & CURRENCIES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CURRENCIES_SQL).await?;

        // ============================================================
        // PART 3: ACCOUNTS & CATEGORIES
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;

        // ============================================================
        // PART 4: TRANSACTIONS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 5: CONVERSION RATES
        // ============================================================
        db.execute_unprepared(CONVERSION_RATES_SQL).await?;

        // ============================================================
        // PART 6: REPORTS
        // ============================================================
        db.execute_unprepared(REPORT_ACCOUNTS_SQL).await?;
        db.execute_unprepared(REPORT_CURRENCIES_SQL).await?;

        // ============================================================
        // PART 7: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_CURRENCIES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Ledger record kinds
CREATE TYPE transaction_kind AS ENUM (
    'plain',
    'exchange',
    'commission'
);

-- Exchange leg roles
CREATE TYPE exchange_type AS ENUM (
    'from_same_currency',
    'to_same_currency',
    'from_different_currency',
    'to_different_currency'
);

-- Commission classification
CREATE TYPE commission_type AS ENUM (
    'commission',
    'profit'
);

-- Category classification
CREATE TYPE category_kind AS ENUM (
    'expense',
    'income'
);

-- Conversion-rate providers
CREATE TYPE rate_source AS ENUM (
    'paralelo',
    'bcv',
    'other'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CURRENCIES_SQL: &str = r"
-- user_id NULL marks a global currency, visible to everyone
CREATE TABLE currencies (
    id UUID PRIMARY KEY,
    user_id UUID REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    symbol TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_currencies_user ON currencies(user_id);
";

const ACCOUNTS_SQL: &str = r"
-- Currencies are delete-protected while accounts reference them
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    currency_id UUID NOT NULL REFERENCES currencies(id) ON DELETE RESTRICT,
    decimal_places INTEGER NOT NULL DEFAULT 2 CHECK (decimal_places BETWEEN 0 AND 18),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_user ON accounts(user_id);
CREATE INDEX idx_accounts_currency ON accounts(currency_id);
";

const CATEGORIES_SQL: &str = r"
-- user_id NULL marks a global category, read-only to non-owners
CREATE TABLE categories (
    id UUID PRIMARY KEY,
    user_id UUID REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    color TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    kind category_kind NOT NULL DEFAULT 'expense',
    parent_id UUID REFERENCES categories(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_categories_user ON categories(user_id);
CREATE INDEX idx_categories_name ON categories(name);
";

const TRANSACTIONS_SQL: &str = r"
-- One table for all record kinds. Accounts are delete-protected; deleting
-- an exchange leg cascades to its paired leg and to commission records
-- referencing either leg; deleting a category detaches it.
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    category_id UUID REFERENCES categories(id) ON DELETE SET NULL,
    amount BIGINT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    date TIMESTAMPTZ NOT NULL,
    to_main_currency_amount BIGINT,
    kind transaction_kind NOT NULL DEFAULT 'plain',
    exchange_type exchange_type,
    related_transaction_id UUID REFERENCES transactions(id) ON DELETE CASCADE,
    exchange_from_id UUID REFERENCES transactions(id) ON DELETE CASCADE,
    exchange_to_id UUID REFERENCES transactions(id) ON DELETE CASCADE,
    commission_type commission_type,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transactions_account_date ON transactions(account_id, date);
CREATE INDEX idx_transactions_user ON transactions(user_id);
CREATE INDEX idx_transactions_related ON transactions(related_transaction_id);
CREATE INDEX idx_transactions_exchange_from ON transactions(exchange_from_id);
CREATE INDEX idx_transactions_exchange_to ON transactions(exchange_to_id);
";

const CONVERSION_RATES_SQL: &str = r"
-- Append-only rate history
CREATE TABLE conversion_rates (
    id UUID PRIMARY KEY,
    user_id UUID REFERENCES users(id) ON DELETE CASCADE,
    currency_from_id UUID NOT NULL REFERENCES currencies(id) ON DELETE CASCADE,
    currency_to_id UUID NOT NULL REFERENCES currencies(id) ON DELETE CASCADE,
    source rate_source NOT NULL DEFAULT 'paralelo',
    rate NUMERIC(20, 8) NOT NULL CHECK (rate > 0),
    date TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_conversion_rates_pair_date
    ON conversion_rates(currency_from_id, currency_to_id, date DESC);
";

const REPORT_ACCOUNTS_SQL: &str = r"
-- One row per (user, account, period); the unique key makes find-or-create
-- the only way rows appear
CREATE TABLE report_accounts (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    from_date DATE NOT NULL,
    to_date DATE NOT NULL,
    initial_balance BIGINT NOT NULL DEFAULT 0,
    end_balance BIGINT NOT NULL DEFAULT 0,
    total_income BIGINT NOT NULL DEFAULT 0,
    total_expenses BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_report_accounts_key UNIQUE (user_id, account_id, from_date, to_date)
);
";

const REPORT_CURRENCIES_SQL: &str = r"
CREATE TABLE report_currencies (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    currency_id UUID NOT NULL REFERENCES currencies(id) ON DELETE CASCADE,
    from_date DATE NOT NULL,
    to_date DATE NOT NULL,
    initial_balance BIGINT NOT NULL DEFAULT 0,
    end_balance BIGINT NOT NULL DEFAULT 0,
    total_income BIGINT NOT NULL DEFAULT 0,
    total_expenses BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_report_currencies_key UNIQUE (user_id, currency_id, from_date, to_date)
);
";

const SEED_CURRENCIES_SQL: &str = r"
INSERT INTO currencies (id, user_id, name, symbol) VALUES
    (gen_random_uuid(), NULL, 'USD', '$'),
    (gen_random_uuid(), NULL, 'VES', 'Bs'),
    (gen_random_uuid(), NULL, 'EUR', '€');
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS report_currencies;
DROP TABLE IF EXISTS report_accounts;
DROP TABLE IF EXISTS conversion_rates;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS categories;
DROP TABLE IF EXISTS accounts;
DROP TABLE IF EXISTS currencies;
DROP TABLE IF EXISTS users;
DROP TYPE IF EXISTS rate_source;
DROP TYPE IF EXISTS category_kind;
DROP TYPE IF EXISTS commission_type;
DROP TYPE IF EXISTS exchange_type;
DROP TYPE IF EXISTS transaction_kind;
";
