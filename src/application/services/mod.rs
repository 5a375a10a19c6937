mod deletion_guard;
mod storage_service;
mod upload_intake;

pub use deletion_guard::DeletionGuard;
pub use storage_service::{CommitOutcome, StagedUpload, StorageService};
pub use upload_intake::{UploadIntake, UploadOutcome, MAX_COMMIT_ATTEMPTS};

use tracing::{error, warn};

use crate::application::error::{ApplicationError, ErrorKind};

// Failure events carry the full detail; the client only ever sees `client_message`.
fn log_failure(operation: &str, error: &ApplicationError) {
    match error.kind() {
        ErrorKind::StorageFailure | ErrorKind::StorageUnavailable => {
            error!(operation, kind = ?error.kind(), "{} failed: {}", operation, error)
        }
        _ => warn!(operation, kind = ?error.kind(), "{} rejected: {}", operation, error),
    }
}
