//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `CustomerId` where a
//! `TermsId` is expected. All AR entities use database sequence keys, so the
//! wrappers hold `i64` rather than generating their own values.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers over sequence keys.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw sequence value.
            #[must_use]
            pub const fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw sequence value.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

typed_id!(CustomerId, "Unique identifier for a customer.");
typed_id!(OpenItemId, "Unique identifier for an AR open item.");
typed_id!(TaxLineId, "Unique identifier for a tax sub-ledger line.");
typed_id!(ApplicationId, "Unique identifier for a payment application.");
typed_id!(TermsId, "Unique identifier for a billing terms record.");
typed_id!(SalesRepId, "Unique identifier for a sales representative.");
typed_id!(ReasonCodeId, "Unique identifier for a reason code.");
typed_id!(SalesCategoryId, "Unique identifier for a sales category.");
typed_id!(GlAccountId, "Unique identifier for a G/L account.");
typed_id!(TaxTypeId, "Unique identifier for a taxpayer type.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_trip() {
        let id = OpenItemId::from_raw(42);
        assert_eq!(id.into_inner(), 42);
        assert_eq!(OpenItemId::from(42), id);
    }

    #[test]
    fn test_display_and_parse() {
        let id = CustomerId::from_raw(1071);
        assert_eq!(id.to_string(), "1071");
        assert_eq!(CustomerId::from_str("1071").unwrap(), id);
        assert!(CustomerId::from_str("not-a-number").is_err());
    }

    #[test]
    fn test_type_distinction() {
        // Same raw value, different types: these must not unify.
        let cust = CustomerId::from_raw(7);
        let terms = TermsId::from_raw(7);
        assert_eq!(cust.into_inner(), terms.into_inner());
    }

    #[test]
    fn test_serde_transparent() {
        let id = SalesRepId::from_raw(12);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "12");
        let back: SalesRepId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
