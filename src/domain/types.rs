//! Strongly-typed value objects used by domain entities.
//!
//! Filter state and recipe records carry these wrappers instead of raw
//! primitives so that numeric constraints are enforced at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// A numeric value required to be positive was zero or invalid.
    #[error("{0} must be greater than zero")]
    NonPositiveNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate newtypes for strictly positive whole numbers.
macro_rules! positive_u32_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(try_from = "u32", into = "u32")]
        pub struct $name(u32);

        impl $name {
            /// Constructs a value that must be greater than zero.
            pub fn new(value: u32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveNumber($field))
                }
            }

            /// Parses a trimmed decimal string into the wrapper.
            pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
                let parsed = value.trim().parse::<u32>().map_err(|_| {
                    TypeConstraintError::InvalidValue(format!("{}: {value}", $field))
                })?;
                Self::new(parsed)
            }

            /// Returns the raw `u32` value.
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<u32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<u32> for $name {
            fn eq(&self, other: &u32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for u32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

positive_u32_newtype!(
    CookTimeMinutes,
    "Upper bound on a recipe's total time, in minutes.",
    "max cook time"
);
positive_u32_newtype!(
    RecencyDays,
    "Size of the \"recently added\" window, in days.",
    "new days"
);

/// Identifier of a recipe as delivered by the backend.
///
/// Older endpoints return numeric ids, newer ones return opaque strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(untagged)]
pub enum RecipeId {
    Int(i64),
    Text(String),
}

impl Display for RecipeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for RecipeId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RecipeId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecipeId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_cook_time() {
        let err = CookTimeMinutes::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveNumber("max cook time"));
    }

    #[test]
    fn parses_trimmed_recency_days() {
        assert_eq!(RecencyDays::parse(" 7 ").unwrap().get(), 7);
        assert!(matches!(
            RecencyDays::parse("soon"),
            Err(TypeConstraintError::InvalidValue(_))
        ));
    }

    #[test]
    fn deserialization_enforces_positivity() {
        let parsed: Result<CookTimeMinutes, _> = serde_json::from_str("0");
        assert!(parsed.is_err());
        let parsed: CookTimeMinutes = serde_json::from_str("30").unwrap();
        assert_eq!(parsed, 30);
    }

    #[test]
    fn recipe_id_accepts_numbers_and_strings() {
        let numeric: RecipeId = serde_json::from_str("12").unwrap();
        let text: RecipeId = serde_json::from_str("\"abc-1\"").unwrap();
        assert_eq!(numeric, RecipeId::Int(12));
        assert_eq!(text.to_string(), "abc-1");
    }
}
