use std::{collections::HashSet, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    application::{
        dto::operation_result_dto::OperationResult,
        error::ApplicationError,
        services::{log_failure, CommitOutcome, StorageService},
    },
    domain::{
        models::file::{ListingEntry, StoredFile, UploadRequest, WRITE_METHOD},
        naming::{resolve_collision, sanitize},
    },
};

/// Upper bound on name reservations lost to concurrent writers before giving up.
pub const MAX_COMMIT_ATTEMPTS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub result: OperationResult<StoredFile>,
    /// Directory contents after the attempt, produced whether or not it succeeded.
    pub listing: Vec<ListingEntry>,
}

/// Turns an untrusted upload into a uniquely named file under the storage root.
#[derive(Clone)]
pub struct UploadIntake {
    storage: Arc<dyn StorageService>,
}

impl UploadIntake {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    pub async fn intake(&self, request: UploadRequest<'_>) -> UploadOutcome {
        let result = self.store(request).await;
        match &result {
            Ok(stored) => info!(
                name = %stored.name,
                size_bytes = stored.size,
                "File uploaded"
            ),
            Err(error) => log_failure("Upload", error),
        }

        UploadOutcome {
            result: result.into(),
            listing: self.listing().await,
        }
    }

    /// Stored files with their size and category, sorted by name for display.
    ///
    /// Never fails: an unreadable directory yields an empty listing and an entry whose
    /// size cannot be read is reported with size 0.
    pub async fn listing(&self) -> Vec<ListingEntry> {
        let names = match self.storage.list_entries().await {
            Ok(names) => names,
            Err(e) => {
                warn!("Failed to list storage directory: {}", e);
                return Vec::new();
            }
        };

        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let size = match self.storage.size_of(&name).await {
                Ok(size) => size,
                Err(e) => {
                    debug!("Size lookup failed for {}: {}", name, e);
                    0
                }
            };
            entries.push(ListingEntry::new(name, size));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    async fn store(&self, request: UploadRequest<'_>) -> Result<StoredFile, ApplicationError> {
        if request.method != WRITE_METHOD {
            return Err(ApplicationError::BadRequest(format!(
                "Invalid request method {}",
                request.method
            )));
        }

        let file = request.file.ok_or_else(|| {
            ApplicationError::BadRequest("Missing required 'file' field".to_string())
        })?;
        let raw_name = file.filename.ok_or_else(|| {
            ApplicationError::BadRequest("Uploaded file has no filename".to_string())
        })?;

        let name = sanitize(&raw_name);
        if name != raw_name {
            debug!(raw = ?raw_name, sanitized = %name, "Filename sanitized");
        }

        let mut staged = self.storage.stage(file.payload).await?;

        // The listing is only a hint; the no-clobber commit is what reserves a name.
        // Names lost to a concurrent writer are remembered so the next attempt skips them.
        let mut lost: HashSet<String> = HashSet::new();
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let mut existing: HashSet<String> =
                self.storage.list_entries().await?.into_iter().collect();
            existing.extend(lost.iter().cloned());

            let candidate = resolve_collision(&name, &existing);
            self.storage.resolve(&candidate)?;

            match self.storage.commit(staged, &candidate).await? {
                CommitOutcome::Committed(stored) => return Ok(stored),
                CommitOutcome::NameTaken(returned) => {
                    debug!(attempt, candidate = %candidate, "Name taken concurrently, retrying");
                    lost.insert(candidate);
                    staged = returned;
                }
            }
        }

        Err(ApplicationError::StorageFailure(format!(
            "No free name for {} after {} attempts",
            name, MAX_COMMIT_ATTEMPTS
        )))
    }
}
