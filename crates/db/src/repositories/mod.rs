//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Mutations return the recompute jobs they require; the
//! dispatcher executes them asynchronously.

pub mod account;
pub mod category;
pub mod conversion;
pub mod dispatcher;
pub mod report;
pub mod transaction;

pub use account::{
    AccountError, AccountRepository, AccountWithBalance, CreateAccountInput, UpdateAccountInput,
};
pub use category::{
    CategoryError, CategoryRepository, CreateCategoryInput, UpdateCategoryInput,
};
pub use conversion::{ConversionError, ConversionRepository, RecordRateInput};
pub use dispatcher::{enqueue_jobs, spawn_recompute_worker, RecomputeSender};
pub use report::{ReportError, ReportRepository};
pub use transaction::{
    CreateExchangeInput, CreateTransactionInput, MutationOutcome, TransactionError,
    TransactionRepository, UpdateTransactionInput,
};
