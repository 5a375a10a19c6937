use std::sync::Arc;

use tracing::info;

use crate::{
    application::{
        dto::operation_result_dto::OperationResult,
        error::ApplicationError,
        services::{log_failure, StorageService},
    },
    domain::{
        models::file::{DeletionRequest, WRITE_METHOD},
        naming::basename,
    },
};

/// Deletes a stored file by exact name, refusing anything that is not a plain entry of the root.
#[derive(Clone)]
pub struct DeletionGuard {
    storage: Arc<dyn StorageService>,
}

impl DeletionGuard {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    pub async fn delete(&self, request: DeletionRequest) -> OperationResult<String> {
        let result = self.remove(request).await;
        match &result {
            Ok(name) => info!(name = %name, "File deleted"),
            Err(error) => log_failure("Delete", error),
        }
        result.into()
    }

    async fn remove(&self, request: DeletionRequest) -> Result<String, ApplicationError> {
        if request.method != WRITE_METHOD {
            return Err(ApplicationError::BadRequest(
                "Invalid request method or missing filename".to_string(),
            ));
        }

        let raw_name = request
            .filename
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ApplicationError::BadRequest(
                    "Invalid request method or missing filename".to_string(),
                )
            })?;

        // Characters are left alone: the target has to match a stored name exactly.
        let name = basename(&raw_name);
        if name.is_empty() {
            return Err(ApplicationError::InvalidName(raw_name));
        }
        self.storage.resolve(name)?;

        // Both cases reach the client as NotFound; only the log tells them apart.
        if !self.storage.exists(name).await? {
            return Err(ApplicationError::NotFound(format!("{} does not exist", name)));
        }
        if !self.storage.is_writable(name).await? {
            return Err(ApplicationError::NotFound(format!("{} is not writable", name)));
        }

        self.storage.remove(name).await?;
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::{
            error::ErrorKind,
            services::{CommitOutcome, StagedUpload},
        },
        domain::models::file::PayloadReader,
        services::LocalStorageService,
    };
    use async_trait::async_trait;
    use axum::http::Method;
    use std::{
        io::Cursor,
        path::{Path, PathBuf},
    };
    use tempfile::{tempdir, TempDir};

    async fn setup(files: &[(&str, &str)]) -> (TempDir, Arc<LocalStorageService>, DeletionGuard) {
        let dir = tempdir().unwrap();
        let storage = Arc::new(
            LocalStorageService::open(dir.path().join("uploads"), 1024)
                .await
                .unwrap(),
        );
        for (name, content) in files {
            storage
                .write_atomically(name, Box::pin(Cursor::new(content.as_bytes())))
                .await
                .unwrap();
        }
        let guard = DeletionGuard::new(storage.clone());
        (dir, storage, guard)
    }

    fn post(filename: &str) -> DeletionRequest {
        DeletionRequest::new(Method::POST, Some(filename.to_string()))
    }

    #[tokio::test]
    async fn deletes_existing_file() {
        let (_dir, storage, guard) = setup(&[("report.pdf", "X")]).await;

        let result = guard.delete(post("report.pdf")).await;
        assert_eq!(result, OperationResult::Success("report.pdf".to_string()));
        assert!(storage.list_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let (_dir, _storage, guard) = setup(&[]).await;

        let result = guard.delete(post("ghost.txt")).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
        assert_eq!(
            result.failure().map(|f| f.reason.as_str()),
            Some("File not found or not writable")
        );
    }

    #[tokio::test]
    async fn traversal_is_reduced_to_basename() {
        let (dir, storage, guard) = setup(&[("passwd", "inside")]).await;
        let outside = dir.path().join("passwd");
        std::fs::write(&outside, b"outside").unwrap();

        let result = guard.delete(post("../passwd")).await;
        assert_eq!(result, OperationResult::Success("passwd".to_string()));
        assert!(outside.exists());
        assert!(!storage.exists("passwd").await.unwrap());
    }

    #[tokio::test]
    async fn parent_reference_alone_is_an_invalid_name() {
        let (_dir, _storage, guard) = setup(&[]).await;

        assert_eq!(
            guard.delete(post("..")).await.error_kind(),
            Some(ErrorKind::InvalidName)
        );
        assert_eq!(
            guard.delete(post("uploads/")).await.error_kind(),
            Some(ErrorKind::InvalidName)
        );
    }

    #[tokio::test]
    async fn name_must_match_exactly() {
        let (_dir, storage, guard) = setup(&[("a b.txt", "x")]).await;

        let result = guard.delete(post("ab.txt")).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));

        let result = guard.delete(post("a b.txt")).await;
        assert!(result.is_success());
        assert!(!storage.exists("a b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn wrong_method_or_missing_name_is_bad_request() {
        let (_dir, storage, guard) = setup(&[("keep.txt", "x")]).await;

        let get = DeletionRequest::new(Method::GET, Some("keep.txt".to_string()));
        assert_eq!(guard.delete(get).await.error_kind(), Some(ErrorKind::BadRequest));

        let absent = DeletionRequest::new(Method::POST, None);
        assert_eq!(guard.delete(absent).await.error_kind(), Some(ErrorKind::BadRequest));

        assert_eq!(guard.delete(post("")).await.error_kind(), Some(ErrorKind::BadRequest));
        assert!(storage.exists("keep.txt").await.unwrap());
    }

    #[tokio::test]
    async fn staging_directory_cannot_be_deleted() {
        let (_dir, _storage, guard) = setup(&[]).await;

        let result = guard.delete(post(crate::services::STAGING_DIR)).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
    }

    /// Local storage whose files all belong to someone else: present but never writable.
    struct ForeignOwnedStorage {
        inner: LocalStorageService,
    }

    #[async_trait]
    impl StorageService for ForeignOwnedStorage {
        fn root(&self) -> &Path {
            self.inner.root()
        }

        fn resolve(&self, name: &str) -> Result<PathBuf, ApplicationError> {
            self.inner.resolve(name)
        }

        async fn ensure_exists(&self) -> Result<(), ApplicationError> {
            self.inner.ensure_exists().await
        }

        async fn list_entries(&self) -> Result<Vec<String>, ApplicationError> {
            self.inner.list_entries().await
        }

        async fn size_of(&self, name: &str) -> Result<u64, ApplicationError> {
            self.inner.size_of(name).await
        }

        async fn exists(&self, name: &str) -> Result<bool, ApplicationError> {
            self.inner.exists(name).await
        }

        async fn is_writable(&self, _name: &str) -> Result<bool, ApplicationError> {
            Ok(false)
        }

        async fn stage(
            &self,
            payload: PayloadReader<'_>,
        ) -> Result<StagedUpload, ApplicationError> {
            self.inner.stage(payload).await
        }

        async fn commit(
            &self,
            staged: StagedUpload,
            name: &str,
        ) -> Result<CommitOutcome, ApplicationError> {
            self.inner.commit(staged, name).await
        }

        async fn remove(&self, name: &str) -> Result<(), ApplicationError> {
            self.inner.remove(name).await
        }
    }

    #[tokio::test]
    async fn unwritable_file_is_reported_as_not_found_and_kept() {
        let (_dir, storage, _guard) = setup(&[("owned_by_root.txt", "x")]).await;
        let guard = DeletionGuard::new(Arc::new(ForeignOwnedStorage {
            inner: (*storage).clone(),
        }));

        let result = guard.delete(post("owned_by_root.txt")).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
        assert_eq!(
            result.failure().map(|f| f.reason.as_str()),
            Some("File not found or not writable")
        );
        assert!(storage.exists("owned_by_root.txt").await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn read_only_mode_alone_does_not_decide_deletion() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, storage, guard) = setup(&[("locked.txt", "x")]).await;
        std::fs::set_permissions(
            storage.root().join("locked.txt"),
            std::fs::Permissions::from_mode(0o444),
        )
        .unwrap();

        // Safety: geteuid has no preconditions.
        let privileged = unsafe { libc::geteuid() == 0 };
        let result = guard.delete(post("locked.txt")).await;
        if privileged {
            assert!(result.is_success());
            assert!(!storage.exists("locked.txt").await.unwrap());
        } else {
            assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
            assert!(storage.exists("locked.txt").await.unwrap());
        }
    }
}
