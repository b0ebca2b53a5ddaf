// File: crm-sync/src/error.rs
// Purpose: Errors raised by the data service and the preference store

use crm_core::{Collection, RecordError, RecordId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid record: {0}")]
    Record(#[from] RecordError),

    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: RecordId },

    #[error("data service unavailable: {0}")]
    Unavailable(String),

    #[error("preferences file error: {0}")]
    PreferencesIo(#[from] std::io::Error),

    #[error("preferences encoding error: {0}")]
    PreferencesJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
