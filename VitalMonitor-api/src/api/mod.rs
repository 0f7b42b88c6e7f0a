pub mod handlers;
pub mod routes;

use axum::Router;
use tracing::info;

use vital_monitor_domain::{services::create_evaluator, ConfigError, MonitorConfig};

use crate::api::routes::AppState;

/// Create the application router from environment configuration
///
/// Fails when the threshold configuration is inconsistent; the caller is
/// expected to abort startup.
pub fn create_application() -> Result<Router, ConfigError> {
    let config = MonitorConfig::from_env()?;
    info!(signaler = %config.signaler, "Building vitals evaluator");
    Ok(routes::create_app(AppState::new(create_evaluator(&config))))
}
