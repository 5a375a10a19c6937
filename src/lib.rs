pub mod adapters;
pub mod application;
pub mod domain;
pub mod services;
pub mod telemetry;

pub use adapters::{routes::build_router, state::AppState};
pub use domain::config::server::ServerConfig;
