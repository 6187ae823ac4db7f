//! HTTP handlers

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{error, info};

use crate::errors::{AppError, AppResult, WebError};
use crate::inputs::validate_source_configs;
use crate::services::RunStatus;
use crate::web::AppState;
use crate::web::responses::{ApiResponse, handle_error, with_status};

pub const M3U_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";
pub const TXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OutputFileStatus {
    pub path: String,
    pub exists: bool,
}

impl OutputFileStatus {
    fn of(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            exists: path.exists(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub is_updating: bool,
    pub last_update: Option<chrono::DateTime<chrono::Utc>>,
    pub last_update_status: Option<RunStatus>,
    pub files: serde_json::Value,
}

/// Service description and endpoint list
pub async fn index() -> impl IntoResponse {
    axum::Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "status": "GET /status",
            "m3u": "GET /playlist.m3u",
            "txt": "GET /playlist.txt",
            "update": "POST /update",
            "validate": "GET /validate",
        }
    }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.coordinator.snapshot();
    axum::Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "last_update": snapshot.last_update,
        "is_updating": snapshot.is_running(),
    }))
}

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.coordinator.snapshot();
    let output = &state.config.output;

    ApiResponse::success(StatusResponse {
        is_updating: snapshot.is_running(),
        last_update: snapshot.last_update,
        last_update_status: snapshot.last_status,
        files: json!({
            "m3u": OutputFileStatus::of(&output.m3u_path),
            "txt": OutputFileStatus::of(&output.txt_path),
        }),
    })
}

pub async fn playlist_m3u(State(state): State<AppState>) -> Response {
    serve_output(&state.config.output.m3u_path, M3U_CONTENT_TYPE, "M3U playlist").await
}

pub async fn playlist_txt(State(state): State<AppState>) -> Response {
    serve_output(&state.config.output.txt_path, TXT_CONTENT_TYPE, "TXT playlist").await
}

async fn serve_output(path: &Path, content_type: &'static str, label: &str) -> Response {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => ([(header::CONTENT_TYPE, content_type)], content).into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            handle_error(AppError::not_found(format!("{label} has not been generated yet")))
        }
        Err(e) => handle_error(e.into()),
    }
}

/// Trigger an aggregation run in the background
///
/// Accepts `Authorization: Bearer <token>`, a bare `Authorization: <token>`
/// or `?token=<token>`.
pub async fn trigger_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Response {
    if let Err(e) = authorize(&headers, &query, &state.config.web.admin_token) {
        return handle_error(e);
    }

    let guard = match state.coordinator.try_begin() {
        Ok(guard) => guard,
        Err(e) => return handle_error(e),
    };
    let run_id = guard.run_id();
    info!("Aggregation {} triggered over HTTP", run_id);

    let service = state.aggregation.clone();
    tokio::spawn(async move {
        let result = service.run().await;
        if let Err(e) = &result {
            error!("Aggregation {} failed: {}", run_id, e);
        }
        guard.finish(&result);
    });

    with_status(
        StatusCode::ACCEPTED,
        json!({
            "run_id": run_id,
            "message": "Aggregation started",
        }),
    )
}

fn authorize(headers: &HeaderMap, query: &TokenQuery, expected: &str) -> AppResult<()> {
    // the `Bearer ` prefix is optional
    let header_token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
        .filter(|token| !token.is_empty());

    let token = header_token
        .or(query.token.as_deref())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| WebError::missing_header("authorization"))?;

    if token != expected {
        return Err(WebError::invalid_auth("invalid admin token").into());
    }
    Ok(())
}

/// Check the input files without aggregating
pub async fn validate(State(state): State<AppState>) -> Response {
    let sources = state.config.sources.clone();
    match tokio::task::spawn_blocking(move || validate_source_configs(&sources)).await {
        Ok(summary) => ApiResponse::success(summary).into_response(),
        Err(e) => handle_error(AppError::internal(format!("validation task failed: {e}"))),
    }
}
