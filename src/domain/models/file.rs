use std::{fmt, path::PathBuf, pin::Pin};

use axum::http::Method;
use serde::Serialize;
use tokio::io::AsyncRead;

use crate::domain::models::category::FileCategory;

/// Byte source of an upload. Consumed exactly once.
pub type PayloadReader<'a> = Pin<Box<dyn AsyncRead + Send + 'a>>;

/// The verb every mutating request has to carry.
pub const WRITE_METHOD: Method = Method::POST;

pub struct UploadedFile<'a> {
    /// `None` when the client sent no filename at all; `Some("")` is a legal empty name.
    pub filename: Option<String>,
    pub payload: PayloadReader<'a>,
}

impl<'a> UploadedFile<'a> {
    pub fn new(filename: Option<String>, payload: PayloadReader<'a>) -> Self {
        Self { filename, payload }
    }

    pub fn from_reader<R>(filename: Option<String>, reader: R) -> Self
    where
        R: AsyncRead + Send + 'a,
    {
        Self::new(filename, Box::pin(reader))
    }
}

impl fmt::Debug for UploadedFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct UploadRequest<'a> {
    pub method: Method,
    /// `None` when the request carried no file field.
    pub file: Option<UploadedFile<'a>>,
}

impl<'a> UploadRequest<'a> {
    pub fn new(method: Method, file: Option<UploadedFile<'a>>) -> Self {
        Self { method, file }
    }
}

#[derive(Debug, Clone)]
pub struct DeletionRequest {
    pub method: Method,
    pub filename: Option<String>,
}

impl DeletionRequest {
    pub fn new(method: Method, filename: Option<String>) -> Self {
        Self { method, filename }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
}

impl StoredFile {
    pub fn new(name: String, path: PathBuf, size: u64) -> Self {
        let extension = extension_of(&name);
        Self {
            name,
            path,
            size,
            extension,
        }
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::classify(self.extension.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub name: String,
    pub size: u64,
    pub category: FileCategory,
}

impl ListingEntry {
    pub fn new(name: String, size: u64) -> Self {
        let category = FileCategory::classify(extension_of(&name).as_deref().unwrap_or_default());
        Self {
            name,
            size,
            category,
        }
    }
}

/// Lower-cased text after the last `.`, or `None` if there is no dot or nothing follows it.
pub fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_without_dot() {
        assert_eq!(extension_of("Report.PDF").as_deref(), Some("pdf"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of(".bashrc").as_deref(), Some("bashrc"));
    }

    #[test]
    fn missing_extension_is_none() {
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn stored_file_derives_extension_and_category() {
        let stored = StoredFile::new("photo(1).JPG".to_string(), PathBuf::from("/x"), 3);
        assert_eq!(stored.extension.as_deref(), Some("jpg"));
        assert_eq!(stored.category(), FileCategory::Image);
    }
}
