use axum::{routing::get, routing::post, Json, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;
use utoipa::OpenApi;

use vital_monitor_domain::services::DynEvaluator;

use crate::api::handlers::{health, vitals};
use crate::openapi::ApiDoc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Evaluator built once at startup; its thresholds never change afterwards
    pub evaluator: Arc<DynEvaluator>,
}

impl AppState {
    pub fn new(evaluator: DynEvaluator) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
        }
    }
}

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        .route("/thresholds", get(vitals::get_thresholds))
        .route("/vitals/evaluate", post(vitals::evaluate_vitals))
        .route("/vitals/check", post(vitals::check_vitals));

    debug!("API routes configured");

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Initialize health check service startup time
    health::initialize_server_start_time();
    debug!("Health check service initialized");

    app
}
