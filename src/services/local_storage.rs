use std::{
    io,
    path::{Path, PathBuf},
    time::Instant,
};

use async_trait::async_trait;
use tokio::{
    fs,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, info, warn};

use crate::{
    application::{
        error::ApplicationError,
        services::{CommitOutcome, StagedUpload, StorageService},
    },
    domain::models::file::{PayloadReader, StoredFile},
    services::error::StorageError,
};

/// Hidden working directory under the root. Not a regular file, so never listed.
pub const STAGING_DIR: &str = ".staging";

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Storage confined to a single flat directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStorageService {
    root: PathBuf,
    max_upload_size: u64,
}

impl LocalStorageService {
    /// Provisions `root` (and the staging area) and pins it to its canonical absolute path.
    pub async fn open(
        root: impl Into<PathBuf>,
        max_upload_size: u64,
    ) -> Result<Self, ApplicationError> {
        let root = root.into();
        create_private_dir(&root).await.map_err(|e| {
            StorageError::Unavailable(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let root = fs::canonicalize(&root).await.map_err(|e| {
            StorageError::Unavailable(format!(
                "Failed to canonicalize storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let service = Self {
            root,
            max_upload_size,
        };
        service.ensure_exists().await?;

        info!(
            root = %service.root.display(),
            max_upload_size = service.max_upload_size,
            "Local storage ready"
        );

        Ok(service)
    }

    fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }
}

async fn create_private_dir(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(path).await
}

fn validate_name(name: &str) -> Result<(), StorageError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn join_error(context: &str, error: tokio::task::JoinError) -> StorageError {
    StorageError::io(context, io::Error::other(error))
}

/// Asks the kernel whether this process may write `path`, so ownership and
/// privileges count as well as the mode bits.
#[cfg(unix)]
fn can_write(path: &Path) -> io::Result<bool> {
    use std::{ffi::CString, os::unix::ffi::OsStrExt};

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    // Safety: `c_path` is NUL-terminated and outlives the call.
    if unsafe { libc::access(c_path.as_ptr(), libc::W_OK) } == 0 {
        return Ok(true);
    }

    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::EACCES) | Some(libc::EPERM) | Some(libc::EROFS) | Some(libc::ENOENT) => {
            Ok(false)
        }
        _ => Err(err),
    }
}

#[cfg(not(unix))]
fn can_write(path: &Path) -> io::Result<bool> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(!meta.permissions().readonly()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, ApplicationError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    async fn ensure_exists(&self) -> Result<(), ApplicationError> {
        for dir in [self.root.clone(), self.staging_dir()] {
            create_private_dir(&dir).await.map_err(|e| {
                StorageError::Unavailable(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<String>, ApplicationError> {
        let mut dir = fs::read_dir(&self.root)
            .await
            .map_err(|e| StorageError::io("Failed to read storage directory", e))?;

        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StorageError::io("Failed to read storage directory entry", e))?
        {
            // `DirEntry::file_type` does not follow symlinks, so links are never listed.
            let is_file = match entry.file_type().await {
                Ok(file_type) => file_type.is_file(),
                Err(e) => {
                    warn!("Skipping unreadable entry {:?}: {}", entry.file_name(), e);
                    continue;
                }
            };
            if !is_file {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => debug!("Skipping non UTF-8 file name {:?}", raw),
            }
        }

        Ok(names)
    }

    async fn size_of(&self, name: &str) -> Result<u64, ApplicationError> {
        let path = self.resolve(name)?;
        match fs::symlink_metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(StorageError::NotFound(name.to_string()).into()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()).into())
            }
            Err(e) => Err(StorageError::io(format!("Failed to stat {}", name), e).into()),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, ApplicationError> {
        let path = self.resolve(name)?;
        match fs::symlink_metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(format!("Failed to stat {}", name), e).into()),
        }
    }

    async fn is_writable(&self, name: &str) -> Result<bool, ApplicationError> {
        let path = self.resolve(name)?;
        match fs::symlink_metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(StorageError::io(format!("Failed to stat {}", name), e).into())
            }
        }

        // Unlinking needs write access to the directory as well as the file.
        let root = self.root.clone();
        let writable = tokio::task::spawn_blocking(move || -> io::Result<bool> {
            Ok(can_write(&path)? && can_write(&root)?)
        })
        .await
        .map_err(|e| join_error("Access check task failed", e))?
        .map_err(|e| StorageError::io(format!("Failed to check access to {}", name), e))?;

        Ok(writable)
    }

    async fn stage(&self, payload: PayloadReader<'_>) -> Result<StagedUpload, ApplicationError> {
        let start = Instant::now();
        let staging = self.staging_dir();

        let temp = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix("upload-")
                .suffix(".part")
                .tempfile_in(staging)
        })
        .await
        .map_err(|e| join_error("Staging task failed", e))?
        .map_err(|e| StorageError::io("Failed to create staging file", e))?;

        // From here on, dropping `temp_path` deletes the partial file.
        let (std_file, temp_path) = temp.into_parts();
        let mut file = fs::File::from_std(std_file);

        let limit = self.max_upload_size;
        let mut limited = payload.take(limit.saturating_add(1));
        let size = tokio::io::copy(&mut limited, &mut file)
            .await
            .map_err(|e| StorageError::io("Failed to receive upload payload", e))?;

        if size > limit {
            warn!(limit, "Upload rejected: payload exceeds size limit");
            return Err(StorageError::PayloadTooLarge { limit }.into());
        }

        file.flush()
            .await
            .map_err(|e| StorageError::io("Failed to flush staging file", e))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::io("Failed to sync staging file", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(FILE_MODE))
                .await
                .map_err(|e| StorageError::io("Failed to set staging file permissions", e))?;
        }

        debug!(
            path = %temp_path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload staged"
        );

        Ok(StagedUpload::new(temp_path, size))
    }

    async fn commit(
        &self,
        staged: StagedUpload,
        name: &str,
    ) -> Result<CommitOutcome, ApplicationError> {
        let target = self.resolve(name)?;
        let (temp_path, size) = staged.into_parts();

        let persisted = tokio::task::spawn_blocking(move || {
            temp_path
                .persist_noclobber(&target)
                .map(|()| target)
        })
        .await
        .map_err(|e| join_error("Commit task failed", e))?;

        match persisted {
            Ok(path) => {
                info!(
                    path = %path.display(),
                    name = %name,
                    size_bytes = size,
                    "Local storage upload successful"
                );
                Ok(CommitOutcome::Committed(StoredFile::new(
                    name.to_string(),
                    path,
                    size,
                )))
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!(name = %name, "Name taken at commit time");
                Ok(CommitOutcome::NameTaken(StagedUpload::new(e.path, size)))
            }
            Err(e) => Err(StorageError::io(
                format!("Failed to move upload into place as {}", name),
                e.error,
            )
            .into()),
        }
    }

    async fn remove(&self, name: &str) -> Result<(), ApplicationError> {
        let path = self.resolve(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), name = %name, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()).into())
            }
            Err(e) => Err(StorageError::io(format!("Failed to delete {}", name), e).into()),
        }
    }
}
