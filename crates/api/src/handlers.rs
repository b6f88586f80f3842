//! Axum REST handlers for the popup API.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use popup_core::types::{Campaign, CampaignDraft, CampaignPatch, MetricKind};
use popup_delivery::matcher;
use popup_store::PopupStore;

use crate::auth;
use crate::models::{EligibleQuery, ErrorResponse, LoginRequest, LoginResponse, ValidationErrorResponse};
use crate::validate;

/// Shared API state.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<PopupStore>,
}

// ─── Auth ──────────────────────────────────────────────────────────────────

pub async fn handle_login(
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    match auth::authenticate(&req) {
        Ok(resp) => Ok(Json(resp)),
        Err(msg) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "auth_failed".to_string(),
                message: msg,
            }),
        )),
    }
}

// ─── Campaign management (admin) ───────────────────────────────────────────

pub async fn list_campaigns(State(state): State<ApiState>) -> Json<Vec<Campaign>> {
    Json(state.store.list())
}

pub async fn get_campaign(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, StatusCode> {
    state.store.get(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn create_campaign(
    State(state): State<ApiState>,
    Json(draft): Json<CampaignDraft>,
) -> Result<(StatusCode, Json<Campaign>), (StatusCode, Json<ValidationErrorResponse>)> {
    if let Err(fields) = validate::validate_draft(&draft) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorResponse::new(fields)),
        ));
    }
    let campaign = state.store.create(draft);
    metrics::counter!("popups.campaigns.created").increment(1);
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn update_campaign(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CampaignPatch>,
) -> Response {
    if let Err(fields) = validate::validate_patch(&patch) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorResponse::new(fields)),
        )
            .into_response();
    }
    match state.store.update(id, patch) {
        Some(campaign) => Json(campaign).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn delete_campaign(State(state): State<ApiState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.store.delete(id) {
        metrics::counter!("popups.campaigns.deleted").increment(1);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

pub async fn duplicate_campaign(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Campaign>), StatusCode> {
    state
        .store
        .duplicate(id)
        .map(|c| {
            metrics::counter!("popups.campaigns.duplicated").increment(1);
            (StatusCode::CREATED, Json(c))
        })
        .ok_or(StatusCode::NOT_FOUND)
}

// ─── Public endpoints ──────────────────────────────────────────────────────

/// Enabled campaigns whose targeting matches the given path. Frequency
/// rules are evaluated client-side, where the session lives.
pub async fn eligible_campaigns(
    State(state): State<ApiState>,
    Query(query): Query<EligibleQuery>,
) -> Json<Vec<Campaign>> {
    let eligible = state
        .store
        .list_enabled()
        .into_iter()
        .filter(|c| matcher::should_show(&c.behaviour.targeting, &query.path))
        .collect();
    Json(eligible)
}

/// Visitor-reported impression/click. Intentionally unauthenticated.
pub async fn track_metric(
    State(state): State<ApiState>,
    Path((id, kind)): Path<(Uuid, MetricKind)>,
) -> StatusCode {
    match state.store.increment_metric(id, kind) {
        Some(_) => {
            metrics::counter!("popups.track.recorded").increment(1);
            StatusCode::NO_CONTENT
        }
        None => {
            // Best-effort telemetry: log and answer 404, nothing retries.
            warn!(campaign_id = %id, ?kind, "Metric report for unknown campaign");
            StatusCode::NOT_FOUND
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
