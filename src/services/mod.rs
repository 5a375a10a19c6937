mod error;
mod local_storage;

pub use error::StorageError;
pub use local_storage::{LocalStorageService, STAGING_DIR};

use std::sync::Arc;

use crate::{
    application::{error::ApplicationError, services::StorageService},
    domain::config::server::ServerConfig,
};

pub async fn create_storage_service(
    config: &ServerConfig,
) -> Result<Arc<dyn StorageService>, ApplicationError> {
    let service = LocalStorageService::open(&config.upload_dir, config.max_upload_size).await?;
    Ok(Arc::new(service))
}
