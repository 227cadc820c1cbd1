//! HTTP API for replyscore
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /analyze - Score a thread (or a single reply) without storing it
//! - POST /webhook/reply - Ingest one message for a lead
//! - GET /lead/{id} - Lead record, lazily re-scored when stale
//! - POST /lead/{id}/outcome - Record meeting / no meeting
//! - POST /lead/{id}/disagree - Record SDR disagreement with the score
//! - GET /leads - Every lead, grouped by tier and ranked
//!
//! Desk calls take per-lead locks and may touch the filesystem, so they run
//! on the blocking pool.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::core::desk::LeadDesk;
use crate::core::engine::now_secs;
use crate::types::{
    AnalysisResult, DisagreeDirection, IngestOutcome, LeadRecord, Message, Outcome, RankedLeads,
    Sender, StoreError,
};

/// App state
pub struct AppState {
    pub desk: LeadDesk,
}

impl AppState {
    pub fn new(desk: LeadDesk) -> Self {
        Self { desk }
    }
}

/// Analyze request: either a full thread or one lead reply
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub thread: Option<Vec<Message>>,
    pub text: Option<String>,
    /// Epoch seconds; defaults to the server clock
    pub now: Option<f64>,
}

/// Incoming reply from the mail provider
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub lead_id: Option<String>,
    pub body: Option<String>,
    pub sender: Option<Sender>,
    pub timestamp: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OutcomeRequest {
    pub outcome: Outcome,
}

#[derive(Debug, Deserialize)]
pub struct DisagreeRequest {
    pub direction: DisagreeDirection,
    pub reason: Option<String>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/webhook/reply", post(webhook_reply))
        .route("/lead/:id", get(get_lead))
        .route("/lead/:id/outcome", post(set_outcome))
        .route("/lead/:id/disagree", post(disagree))
        .route("/leads", get(ranked_leads))
        .with_state(state)
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Score without touching the store
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, StatusCode> {
    let now = req.now.unwrap_or_else(now_secs);
    let engine = state.desk.engine();

    let result = match (req.thread, req.text) {
        (Some(thread), _) => engine.analyze_thread_at(&thread, now),
        (None, Some(text)) => engine.analyze_thread_at(&[Message::lead(text, now)], now),
        (None, None) => return Err(StatusCode::BAD_REQUEST),
    };
    Ok(Json(result))
}

/// Ingest one reply for a lead
async fn webhook_reply(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WebhookRequest>,
) -> Result<Json<IngestOutcome>, StatusCode> {
    let lead_id = req.lead_id.filter(|id| !id.trim().is_empty()).ok_or(StatusCode::BAD_REQUEST)?;
    let body = req.body.filter(|b| !b.trim().is_empty()).ok_or(StatusCode::BAD_REQUEST)?;

    let message = Message {
        sender: Some(req.sender.unwrap_or(Sender::Lead)),
        body,
        timestamp: req.timestamp,
    };
    let outcome = on_desk(&state, move |desk| desk.ingest(&lead_id, message, now_secs())).await?;
    Ok(Json(outcome))
}

/// Get lead record
async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LeadRecord>, StatusCode> {
    let record = on_desk(&state, move |desk| desk.refresh(&id, now_secs()))
        .await?
        .map_err(internal)?;
    record.map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Record meeting outcome
async fn set_outcome(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<OutcomeRequest>,
) -> Result<Json<LeadRecord>, StatusCode> {
    let record = on_desk(&state, move |desk| desk.set_outcome(&id, req.outcome))
        .await?
        .map_err(internal)?;
    record.map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Record SDR disagreement
async fn disagree(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<DisagreeRequest>,
) -> Result<Json<LeadRecord>, StatusCode> {
    let record = on_desk(&state, move |desk| {
        desk.record_disagreement(&id, req.direction, req.reason, now_secs())
    })
    .await?
    .map_err(internal)?;
    record.map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Ranked view of every stored lead
async fn ranked_leads(State(state): State<Arc<AppState>>) -> Result<Json<RankedLeads>, StatusCode> {
    let board = on_desk(&state, |desk| desk.ranked(now_secs())).await?.map_err(internal)?;
    Ok(Json(board))
}

/// Run a desk call on the blocking pool
async fn on_desk<T, F>(state: &Arc<AppState>, work: F) -> Result<T, StatusCode>
where
    F: FnOnce(&LeadDesk) -> T + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || work(&state.desk)).await.map_err(|e| {
        error!(error = %e, "Desk task failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn internal(err: StoreError) -> StatusCode {
    error!(error = %err, "Lead store error");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Run the API server
pub async fn run_server(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "replyscore API running");
    info!("  GET  /health             - Health check");
    info!("  POST /analyze            - Score a thread");
    info!("  POST /webhook/reply      - Ingest a reply");
    info!("  GET  /lead/:id           - Lead record");
    info!("  POST /lead/:id/outcome   - Record outcome");
    info!("  POST /lead/:id/disagree  - Disagree with score");
    info!("  GET  /leads              - Ranked leads");
    axum::serve(listener, router).await?;
    Ok(())
}
