//! HTTP request handlers

use super::pages;
use super::types::{ErrorResponse, NavigateStageRequest, NewStageResponse, NEW_STAGE, RESPONSE_TYPE_HEADER};
use super::AppState;
use crate::scheduling::{ScheduleRequest, SinkError};
use crate::stages::UnknownStage;
use crate::tools::{NAVIGATE_STAGE_PATH, SCHEDULE_EVENT_PATH};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Browser
        .route("/", get(index))
        .route("/start", post(start_call))
        .route("/end", get(end_call))
        // Tool callbacks from the provider
        .route(NAVIGATE_STAGE_PATH, post(navigate_stage))
        .route(SCHEDULE_EVENT_PATH, post(schedule_event))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Browser
// ============================================================

async fn index() -> Html<String> {
    Html(pages::index_page())
}

async fn start_call(State(state): State<AppState>) -> Html<String> {
    match state.bootstrap.start_call().await {
        Ok(call) => {
            tracing::info!(call_id = %call.call_id, "Call started");
            Html(pages::call_fragment(&call))
        }
        Err(e) => {
            // htmx only swaps 2xx responses, so the failure travels as a fragment.
            // LoggingProvider already reported it.
            tracing::debug!(kind = ?e.kind, "Showing call start failure");
            Html(pages::provider_error_fragment(e.detail()))
        }
    }
}

async fn end_call() -> Html<String> {
    Html(pages::restart_button())
}

async fn get_version() -> &'static str {
    concat!("ultravox-stages ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Stage Navigation
// ============================================================

async fn navigate_stage(
    State(state): State<AppState>,
    payload: Result<Json<NavigateStageRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload.map_err(|e| AppError::MalformedRequest(e.body_text()))?;
    if req.stage_name.trim().is_empty() {
        return Err(AppError::MalformedRequest("stageName must not be empty".to_string()));
    }
    if req.call_id.trim().is_empty() {
        return Err(AppError::MalformedRequest("call_id must not be empty".to_string()));
    }

    let target = state.registry.lookup(&req.stage_name).map_err(|e| {
        tracing::warn!(call_id = %req.call_id, stage = %e.stage_name, "Unknown stage requested");
        AppError::UnknownStage(e)
    })?;

    tracing::info!(
        call_id = %req.call_id,
        stage = %target.id,
        tools = ?target.tool_names(),
        "Navigating to stage"
    );

    let body = NewStageResponse {
        system_prompt: &target.system_prompt,
        selected_tools: target.selected_tools(),
    };
    Ok((
        [(
            HeaderName::from_static(RESPONSE_TYPE_HEADER),
            HeaderValue::from_static(NEW_STAGE),
        )],
        Json(body),
    )
        .into_response())
}

// ============================================================
// Scheduling
// ============================================================

async fn schedule_event(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<(StatusCode, &'static str), AppError> {
    let Json(req) = payload.map_err(|e| AppError::InvalidSchedule(e.body_text()))?;

    state.scheduler.schedule(&req).await.map_err(|e| {
        tracing::warn!(call_id = %req.call_id, error = %e, "Schedule request rejected");
        match e {
            SinkError::Invalid(msg) => AppError::InvalidSchedule(msg),
            SinkError::Backend(msg) => AppError::SchedulingFailed(msg),
        }
    })?;

    Ok((StatusCode::OK, "Event successfully created"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    MalformedRequest(String),
    UnknownStage(UnknownStage),
    InvalidSchedule(String),
    SchedulingFailed(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MalformedRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("malformed_request", msg),
            ),
            AppError::UnknownStage(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("unknown_stage", e.to_string()).with_stage_name(e.stage_name),
            ),
            AppError::InvalidSchedule(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("invalid_schedule_request", msg),
            ),
            AppError::SchedulingFailed(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new("scheduling_failed", msg),
            ),
        };

        (status, Json(body)).into_response()
    }
}
