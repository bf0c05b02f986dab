use std::sync::Arc;

use shuttle_axum::axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::agent::{self, DynAgentClient};
use crate::config::ServiceConfig;
use crate::lead::Lead;
use crate::metrics;
use crate::normalize::{self, AgentOutput, NormalizedResponse};
use crate::notify::{DynEventSink, EventDispatcher, TrackRequest};

#[derive(Clone)]
pub struct AppState {
    pub agent: DynAgentClient,
    pub events: DynEventSink,
}

impl AppState {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            agent: agent::build_client_from_config(&config.agent),
            events: Arc::new(EventDispatcher::new(config.webhooks.clone())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/normalize", post(normalize_output))
        .route("/diagnose", post(diagnose))
        .route("/track", post(track))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NormalizeReq {
    #[serde(default)]
    agent_output: AgentOutput,
    #[serde(default)]
    lead: Lead,
}

/// Workflow-engine surface: one agent output + one lead in, exactly one
/// normalized shape out. Always 200.
async fn normalize_output(Json(body): Json<NormalizeReq>) -> Json<NormalizedResponse> {
    let resp = normalize::normalize(&body.agent_output, &body.lead);
    metrics::record_outcome(&resp);
    Json(resp)
}

/// Full lead flow: ask the configured agent for a draft, normalize it,
/// answer with a shape the widget can always render.
async fn diagnose(
    State(state): State<AppState>,
    Json(lead): Json<Lead>,
) -> Json<NormalizedResponse> {
    info!(
        target: "diagnose",
        lead = %lead.anon_id(),
        provider = state.agent.provider_name(),
        "diagnostic requested"
    );

    let output = state.agent.diagnose(&lead).await.unwrap_or_default();
    let resp = normalize::normalize(&output, &lead);
    metrics::record_outcome(&resp);
    Json(resp)
}

/// Tracking webhook relay. 204 on success; failures collapse into one
/// generic 502 so the front end only ever distinguishes success/failure.
async fn track(
    State(state): State<AppState>,
    Json(req): Json<TrackRequest>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    match state.events.track(&req.event, &req.payload, &req.path).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(_) => {
            metrics::record_track_failure();
            Err((StatusCode::BAD_GATEWAY, "event tracking failed"))
        }
    }
}
