use serde::Serialize;
use thiserror::Error;

/// Client-visible failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    InvalidName,
    NotFound,
    PayloadTooLarge,
    StorageUnavailable,
    StorageFailure,
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Payload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl ApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplicationError::BadRequest(_) => ErrorKind::BadRequest,
            ApplicationError::InvalidName(_) => ErrorKind::InvalidName,
            ApplicationError::NotFound(_) => ErrorKind::NotFound,
            ApplicationError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            ApplicationError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            ApplicationError::StorageFailure(_) => ErrorKind::StorageFailure,
        }
    }

    /// Text that is safe to show a client. OS error detail never appears here.
    pub fn client_message(&self) -> String {
        match self {
            ApplicationError::BadRequest(msg) => msg.clone(),
            ApplicationError::InvalidName(_) => "Invalid filename".to_string(),
            ApplicationError::NotFound(_) => "File not found or not writable".to_string(),
            ApplicationError::PayloadTooLarge { limit } => {
                format!("File too large (limit is {} bytes)", limit)
            }
            ApplicationError::StorageUnavailable(_) => "Storage unavailable".to_string(),
            ApplicationError::StorageFailure(_) => "Storage operation failed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_message_hides_storage_detail() {
        let error = ApplicationError::StorageFailure("EACCES on /srv/uploads/x".to_string());
        assert_eq!(error.kind(), ErrorKind::StorageFailure);
        assert!(!error.client_message().contains("/srv"));
    }

    #[test]
    fn not_found_message_does_not_distinguish_permission() {
        let error = ApplicationError::NotFound("a.txt is read-only".to_string());
        assert_eq!(error.client_message(), "File not found or not writable");
    }
}
