//! HTTP handlers

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use crate::{
    errors::{API_FAIL, INVALID_TOKEN, LLM_FAIL},
    oracle::AuditOrchestrator,
    types::{AuditResponse, HealthStatus},
    utils::print_audit_response,
};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AuditOrchestrator>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(orchestrator: Arc<AuditOrchestrator>) -> Self {
        Self {
            orchestrator,
            started_at: Instant::now(),
        }
    }
}

/// Verdicts are 200 whether approved or not. Errors map by code.
pub fn status_for(response: &AuditResponse) -> StatusCode {
    match response.error().map(|e| e.error_code) {
        None => StatusCode::OK,
        Some(INVALID_TOKEN) => StatusCode::BAD_REQUEST,
        Some(API_FAIL) | Some(LLM_FAIL) => StatusCode::BAD_GATEWAY,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn analyze(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    debug!("POST /analyze ({} bytes)", body.len());
    let response = state.orchestrator.analyze_payload(&body).await;
    print_audit_response(&response);
    (status_for(&response), Json(response))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let orchestrator = &state.orchestrator;
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        classifiers: orchestrator.classifier_names(),
        trust_list_size: orchestrator.config().trust_list.len(),
        signer_address: orchestrator.signer_address(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
