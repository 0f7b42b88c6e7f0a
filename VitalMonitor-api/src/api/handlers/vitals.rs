use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use vital_monitor_domain::Reading;

use crate::api::routes::AppState;
use crate::entities::common::ErrorResponse;
use crate::entities::vitals::{
    convert_to_public_verdicts, CheckResponse, EvaluationResponse, ThresholdsResponse,
};

/// Errors surfaced by the vitals endpoints
#[derive(Debug, Error)]
pub enum VitalsApiError {
    /// The request body is not a valid reading
    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    /// The blocking alert worker did not complete
    #[error("Alert worker failed: {0}")]
    Worker(String),
}

impl IntoResponse for VitalsApiError {
    fn into_response(self) -> Response {
        match self {
            VitalsApiError::InvalidReading(_) => {
                ErrorResponse::bad_request(self.to_string()).into_response_with(StatusCode::BAD_REQUEST)
            }
            VitalsApiError::Worker(_) => ErrorResponse::internal(self.to_string())
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

fn extract_reading(payload: Result<Json<Reading>, JsonRejection>) -> Result<Reading, VitalsApiError> {
    payload
        .map(|Json(reading)| reading)
        .map_err(|rejection| {
            warn!("Rejected reading payload: {}", rejection.body_text());
            VitalsApiError::InvalidReading(rejection.body_text())
        })
}

/// Get the active threshold table
#[utoipa::path(
    get,
    path = "/api/v1/thresholds",
    responses(
        (status = 200, description = "Active thresholds", body = ThresholdsResponse)
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_thresholds(State(state): State<AppState>) -> Json<ThresholdsResponse> {
    Json(ThresholdsResponse::new(state.evaluator.thresholds(), state.evaluator.policy()))
}

/// Evaluate a reading without raising any alert
#[utoipa::path(
    post,
    path = "/api/v1/vitals/evaluate",
    request_body = Reading,
    responses(
        (status = 200, description = "Per-vital verdicts", body = EvaluationResponse),
        (status = 400, description = "Malformed reading", body = ErrorResponse)
    ),
    tag = "vitals"
)]
#[instrument(skip(state, payload))]
pub async fn evaluate_vitals(
    State(state): State<AppState>,
    payload: Result<Json<Reading>, JsonRejection>,
) -> Result<Json<EvaluationResponse>, VitalsApiError> {
    let reading = extract_reading(payload)?;
    let verdicts = state.evaluator.evaluate_sample(&reading);

    Ok(Json(EvaluationResponse {
        all_within_range: verdicts.all_within_range(),
        verdicts: convert_to_public_verdicts(&verdicts),
    }))
}

/// Check a reading and raise alerts for out-of-range vitals.
///
/// Alerting blocks for the signaler's full pattern, so the check runs on the
/// blocking pool and the response is sent only after every alert finished.
#[utoipa::path(
    post,
    path = "/api/v1/vitals/check",
    request_body = Reading,
    responses(
        (status = 200, description = "Aggregate decision and raised alerts", body = CheckResponse),
        (status = 400, description = "Malformed reading", body = ErrorResponse),
        (status = 500, description = "Alert delivery failed", body = ErrorResponse)
    ),
    tag = "vitals"
)]
#[instrument(skip(state, payload))]
pub async fn check_vitals(
    State(state): State<AppState>,
    payload: Result<Json<Reading>, JsonRejection>,
) -> Result<Json<CheckResponse>, VitalsApiError> {
    let reading = extract_reading(payload)?;
    let evaluator = state.evaluator.clone();

    let (verdicts, outcome) = tokio::task::spawn_blocking(move || {
        let verdicts = evaluator.evaluate_sample(&reading);
        let outcome = evaluator.check_sample(&reading);
        (verdicts, outcome)
    })
    .await
    .map_err(|e| {
        error!("Alert worker failed: {}", e);
        VitalsApiError::Worker(e.to_string())
    })?;

    info!(safe = outcome.safe, alerts = outcome.alerted.len(), "Vitals checked");

    Ok(Json(CheckResponse {
        safe: outcome.safe,
        alerted: outcome.alerted,
        policy: state.evaluator.policy(),
        verdicts: convert_to_public_verdicts(&verdicts),
        checked_at: Utc::now(),
    }))
}
