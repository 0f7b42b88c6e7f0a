use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use vital_monitor_domain::services::DynEvaluator;
use vital_monitor_domain::testing::RecordingSignaler;
use vital_monitor_domain::{AlertPolicy, AlertSignaler, ThresholdTable, VitalsEvaluator};

use crate::api::routes::{create_app, AppState};

/// Build a router whose alerts are recorded rather than blinked
pub fn test_app(policy: AlertPolicy) -> (Router, Arc<RecordingSignaler>) {
    let recorder = Arc::new(RecordingSignaler::new());
    let signaler: Box<dyn AlertSignaler> = Box::new(recorder.clone());
    let evaluator: DynEvaluator = VitalsEvaluator::new(ThresholdTable::default(), signaler).with_policy(policy);
    (create_app(AppState::new(evaluator)), recorder)
}

/// Send a request and decode the JSON body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
