use serde::Serialize;

use crate::application::error::{ApplicationError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationFailure {
    pub kind: ErrorKind,
    pub reason: String,
}

impl From<&ApplicationError> for OperationFailure {
    fn from(error: &ApplicationError) -> Self {
        Self {
            kind: error.kind(),
            reason: error.client_message(),
        }
    }
}

/// Outcome handed to the presentation layer; orchestrators never return a bare error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult<T> {
    Success(T),
    Failure(OperationFailure),
}

impl<T> OperationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            OperationResult::Success(value) => Some(value),
            OperationResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&OperationFailure> {
        match self {
            OperationResult::Success(_) => None,
            OperationResult::Failure(failure) => Some(failure),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.failure().map(|failure| failure.kind)
    }
}

impl<T> From<Result<T, ApplicationError>> for OperationResult<T> {
    fn from(result: Result<T, ApplicationError>) -> Self {
        match result {
            Ok(value) => OperationResult::Success(value),
            Err(error) => OperationResult::Failure(OperationFailure::from(&error)),
        }
    }
}
