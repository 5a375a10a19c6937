use std::process::ExitCode;

use tracing::{error, info};
use upload_vault::{build_router, services, telemetry, AppState, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init(config.event_log_path.as_deref()) {
        eprintln!("ERROR: {}", e);
        return ExitCode::FAILURE;
    }

    info!(
        "Starting upload-vault with storage root {}",
        config.upload_dir.display()
    );

    let storage = match services::create_storage_service(&config).await {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to provision storage: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let router = build_router(AppState::new(storage), &config);

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to port {}: {}", config.port, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on 0.0.0.0:{}", config.port);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
