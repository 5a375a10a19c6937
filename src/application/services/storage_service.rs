use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempPath;

use crate::{
    application::error::ApplicationError,
    domain::models::file::{PayloadReader, StoredFile},
};

/// A fully received payload waiting for its final name. Dropping it discards the bytes.
#[derive(Debug)]
pub struct StagedUpload {
    path: TempPath,
    size: u64,
}

impl StagedUpload {
    pub(crate) fn new(path: TempPath, size: u64) -> Self {
        Self { path, size }
    }

    pub(crate) fn into_parts(self) -> (TempPath, u64) {
        (self.path, self.size)
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

#[derive(Debug)]
pub enum CommitOutcome {
    Committed(StoredFile),
    /// The name was occupied; the staged bytes come back untouched for another attempt.
    NameTaken(StagedUpload),
}

/// A flat directory of stored files. Every name-taking operation rejects names that
/// could address anything outside the root.
#[async_trait]
pub trait StorageService: Send + Sync {
    fn root(&self) -> &Path;

    /// Maps a bare file name to its absolute path under the root.
    fn resolve(&self, name: &str) -> Result<PathBuf, ApplicationError>;

    async fn ensure_exists(&self) -> Result<(), ApplicationError>;

    /// Regular files directly under the root, in no particular order.
    async fn list_entries(&self) -> Result<Vec<String>, ApplicationError>;

    async fn size_of(&self, name: &str) -> Result<u64, ApplicationError>;

    async fn exists(&self, name: &str) -> Result<bool, ApplicationError>;

    async fn is_writable(&self, name: &str) -> Result<bool, ApplicationError>;

    /// Receives the whole payload into a hidden staging file.
    async fn stage(&self, payload: PayloadReader<'_>) -> Result<StagedUpload, ApplicationError>;

    /// Gives a staged payload its final name, never replacing an existing entry.
    async fn commit(&self, staged: StagedUpload, name: &str)
        -> Result<CommitOutcome, ApplicationError>;

    async fn remove(&self, name: &str) -> Result<(), ApplicationError>;

    async fn write_atomically(
        &self,
        name: &str,
        payload: PayloadReader<'_>,
    ) -> Result<u64, ApplicationError> {
        let staged = self.stage(payload).await?;
        match self.commit(staged, name).await? {
            CommitOutcome::Committed(stored) => Ok(stored.size),
            CommitOutcome::NameTaken(_) => Err(ApplicationError::StorageFailure(format!(
                "Name already taken: {}",
                name
            ))),
        }
    }
}
