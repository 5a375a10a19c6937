use std::sync::Arc;

use axum::extract::FromRef;

use crate::application::services::{DeletionGuard, StorageService, UploadIntake};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub upload_intake: UploadIntake,
    pub deletion_guard: DeletionGuard,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self {
            upload_intake: UploadIntake::new(storage.clone()),
            deletion_guard: DeletionGuard::new(storage),
        }
    }
}
