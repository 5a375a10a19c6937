use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{any, get},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::{
    adapters::{controllers::file_controller::FileController, state::AppState},
    domain::config::server::ServerConfig,
};

/// Room for multipart boundaries and headers on top of the per-file limit.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

pub fn build_router(app_state: AppState, config: &ServerConfig) -> Router {
    let body_limit = usize::try_from(config.max_upload_size.saturating_add(MULTIPART_OVERHEAD))
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/api/v1/files", get(FileController::list_files))
        .route("/api/v1/files/upload", any(FileController::upload_file))
        .route("/api/v1/files/delete", any(FileController::delete_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(config))
        .with_state(app_state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(allowed_origins) => {
            let origins: Vec<HeaderValue> = allowed_origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin {:?}", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        // Allow all origins if not specified (only for development)
        None => CorsLayer::permissive(),
    }
}
