use serde::{Deserialize, Serialize};

use crate::{
    adapters::error::ErrorBody,
    application::{
        dto::operation_result_dto::OperationResult, services::UploadOutcome,
    },
    domain::models::{
        category::FileCategory,
        file::{ListingEntry, StoredFile},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct StoredFileResponse {
    pub name: String,
    pub size: u64,
    #[serde(rename = "sizeLabel")]
    pub size_label: String,
    pub extension: Option<String>,
    pub category: FileCategory,
}

impl From<&StoredFile> for StoredFileResponse {
    fn from(file: &StoredFile) -> Self {
        Self {
            name: file.name.clone(),
            size: file.size,
            size_label: format_file_size(file.size),
            extension: file.extension.clone(),
            category: file.category(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingEntryResponse {
    pub name: String,
    pub size: u64,
    #[serde(rename = "sizeLabel")]
    pub size_label: String,
    pub category: FileCategory,
}

impl From<ListingEntry> for ListingEntryResponse {
    fn from(entry: ListingEntry) -> Self {
        Self {
            size_label: format_file_size(entry.size),
            name: entry.name,
            size: entry.size,
            category: entry.category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadFileResponse {
    pub status: ResponseStatus,
    #[serde(rename = "storedFile", skip_serializing_if = "Option::is_none")]
    pub stored_file: Option<StoredFileResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub listing: Vec<ListingEntryResponse>,
}

impl From<UploadOutcome> for UploadFileResponse {
    fn from(outcome: UploadOutcome) -> Self {
        let (status, stored_file, error) = match &outcome.result {
            OperationResult::Success(stored) => {
                (ResponseStatus::Success, Some(StoredFileResponse::from(stored)), None)
            }
            OperationResult::Failure(failure) => {
                (ResponseStatus::Error, None, Some(ErrorBody::from(failure)))
            }
        };

        Self {
            status,
            stored_file,
            error,
            listing: outcome.listing.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteFileRequest {
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteFileResponse {
    pub status: ResponseStatus,
    #[serde(rename = "deletedName", skip_serializing_if = "Option::is_none")]
    pub deleted_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl From<&OperationResult<String>> for DeleteFileResponse {
    fn from(result: &OperationResult<String>) -> Self {
        match result {
            OperationResult::Success(name) => Self {
                status: ResponseStatus::Success,
                deleted_name: Some(name.clone()),
                error: None,
            },
            OperationResult::Failure(failure) => Self {
                status: ResponseStatus::Error,
                deleted_name: None,
                error: Some(ErrorBody::from(failure)),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    pub files: Vec<ListingEntryResponse>,
}

/// Human-readable size with binary multiples, e.g. `1.50 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
