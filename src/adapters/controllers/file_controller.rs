use std::io;

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        rejection::FormRejection,
        Form, Multipart, State,
    },
    http::{Method, StatusCode},
    Json,
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    adapters::{
        dto::file_dto::{
            DeleteFileRequest, DeleteFileResponse, ListFilesResponse, UploadFileResponse,
        },
        error::status_for,
        state::AppState,
    },
    application::dto::operation_result_dto::OperationResult,
    domain::models::file::{DeletionRequest, PayloadReader, UploadRequest, UploadedFile},
};

/// Multipart field that carries the uploaded file.
pub const FILE_FIELD: &str = "file";

pub struct FileController;

impl FileController {
    /// GET /api/v1/files
    pub async fn list_files(State(app_state): State<AppState>) -> Json<ListFilesResponse> {
        let listing = app_state.upload_intake.listing().await;
        Json(ListFilesResponse {
            files: listing.into_iter().map(Into::into).collect(),
        })
    }

    /// ANY /api/v1/files/upload
    /// Body: multipart form with a `file` field. Non-POST methods are rejected by the intake.
    pub async fn upload_file(
        State(app_state): State<AppState>,
        method: Method,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> (StatusCode, Json<UploadFileResponse>) {
        let span = info_span!("upload", request_id = %Uuid::new_v4());

        async move {
            let intake = &app_state.upload_intake;

            let outcome = match multipart {
                Err(rejection) => {
                    warn!("Invalid multipart request: {}", rejection);
                    intake.intake(UploadRequest::new(method, None)).await
                }
                Ok(mut multipart) => loop {
                    match multipart.next_field().await {
                        Ok(Some(field)) if field.name() == Some(FILE_FIELD) => {
                            let filename = field.file_name().map(str::to_string);
                            info!("Receiving upload {:?}", filename);
                            let file = UploadedFile::new(filename, field_reader(field));
                            break intake.intake(UploadRequest::new(method, Some(file))).await;
                        }
                        Ok(Some(_)) => continue,
                        Ok(None) => {
                            break intake.intake(UploadRequest::new(method, None)).await;
                        }
                        Err(e) => {
                            warn!("Invalid multipart data: {}", e);
                            break intake.intake(UploadRequest::new(method, None)).await;
                        }
                    }
                },
            };

            let status = match &outcome.result {
                OperationResult::Success(_) => StatusCode::CREATED,
                OperationResult::Failure(failure) => status_for(failure.kind),
            };

            (status, Json(UploadFileResponse::from(outcome)))
        }
        .instrument(span)
        .await
    }

    /// ANY /api/v1/files/delete
    /// Body: form-encoded `filename`. Non-POST methods are rejected by the guard.
    pub async fn delete_file(
        State(app_state): State<AppState>,
        method: Method,
        form: Result<Form<DeleteFileRequest>, FormRejection>,
    ) -> (StatusCode, Json<DeleteFileResponse>) {
        let span = info_span!("delete", request_id = %Uuid::new_v4());

        async move {
            let filename = match form {
                Ok(Form(body)) => body.filename,
                Err(rejection) => {
                    warn!("Invalid delete form: {}", rejection);
                    None
                }
            };

            let result = app_state
                .deletion_guard
                .delete(DeletionRequest::new(method, filename))
                .await;

            let status = match &result {
                OperationResult::Success(_) => StatusCode::OK,
                OperationResult::Failure(failure) => status_for(failure.kind),
            };

            (status, Json(DeleteFileResponse::from(&result)))
        }
        .instrument(span)
        .await
    }
}

// Read errors from a dropped connection surface as io errors on the payload.
fn field_reader(field: Field<'_>) -> PayloadReader<'_> {
    Box::pin(StreamReader::new(field.map_err(io::Error::other)))
}
