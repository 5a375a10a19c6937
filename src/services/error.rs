use std::io;

use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Payload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        StorageError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::InvalidName(name) => ApplicationError::InvalidName(name),
            StorageError::NotFound(name) => ApplicationError::NotFound(name),
            StorageError::PayloadTooLarge { limit } => ApplicationError::PayloadTooLarge { limit },
            StorageError::Unavailable(msg) => ApplicationError::StorageUnavailable(msg),
            StorageError::Io { .. } => ApplicationError::StorageFailure(error.to_string()),
        }
    }
}
