// File: crm-core/src/error.rs
// Purpose: Errors raised while coercing backend rows into strict records

use thiserror::Error;

/// A backend row that does not fit the record model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record has an empty identifier")]
    MissingId,

    #[error("unknown priority label '{0}'")]
    UnknownPriority(String),

    #[error("unknown property category '{0}'")]
    UnknownCategory(String),

    #[error("invalid calendar date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid price {0}")]
    InvalidPrice(f64),
}
