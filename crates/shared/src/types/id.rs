//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `UserId` where an
//! `AccountId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(CurrencyId, "Unique identifier for a currency.");
typed_id!(AccountId, "Unique identifier for an account.");
typed_id!(TransactionId, "Unique identifier for a ledger transaction.");
typed_id!(CategoryId, "Unique identifier for a category.");
typed_id!(
    ConversionRecordId,
    "Unique identifier for a conversion-rate record."
);
typed_id!(ReportAccountId, "Unique identifier for an account report.");
typed_id!(ReportCurrencyId, "Unique identifier for a currency report.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(AccountId::new(), AccountId::new());
    }

    #[test]
    fn test_round_trip_through_uuid() {
        let id = TransactionId::new();
        assert_eq!(TransactionId::from_uuid(id.into_inner()), id);
    }

    #[test]
    fn test_display_and_parse() {
        let id = UserId::new();
        assert_eq!(UserId::from_str(&id.to_string()).unwrap(), id);
        assert!(UserId::from_str("not-a-uuid").is_err());
    }
}
