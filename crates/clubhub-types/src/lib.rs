//! Clubhub Types - Pure type definitions
//!
//! Entities, insert payloads, partial updates and the enriched read models
//! returned by the storage layer. No async runtime dependencies.

pub mod announcement;
pub mod club;
pub mod membership;
pub mod user;
pub mod view;

pub use announcement::*;
pub use club::*;
pub use membership::*;
pub use user::*;
pub use view::*;

use thiserror::Error;

/// Error returned when a role or category string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Serde helper for fields that can be left alone, cleared, or set.
///
/// A missing field deserializes to `None`, an explicit `null` to
/// `Some(None)`, and a value to `Some(Some(v))`.
pub(crate) mod nullable {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
