//! Exchange planning errors.

use cambio_shared::types::MoneyError;
use thiserror::Error;

/// Error types for exchange planning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// Both request amounts must be positive magnitudes; the direction of
    /// each leg is fixed by its role, not by the caller's sign.
    #[error("Exchange amounts must be positive")]
    NonPositiveAmount,

    /// An amount could not be encoded at the account's precision.
    #[error(transparent)]
    Money(#[from] MoneyError),
}
