//! HTTP response types and error mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::{AppError, WebError};

/// Standard JSON envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = if self.success {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(self)).into_response()
    }
}

/// Wrap a successful payload with an explicit status code
pub fn with_status<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse::success(data))).into_response()
}

/// Map an application error to a status code and JSON body
pub fn handle_error(error: AppError) -> Response {
    let status = match &error {
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::OperationInProgress { .. } => StatusCode::CONFLICT,
        AppError::Web(WebError::MissingHeader { .. }) => StatusCode::UNAUTHORIZED,
        AppError::Web(WebError::InvalidAuth { .. }) => StatusCode::FORBIDDEN,
        AppError::Source(_) | AppError::Http(_) => StatusCode::BAD_GATEWAY,
        AppError::Io(_) | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        error!("Request failed: {}", error);
    } else {
        warn!("Request rejected: {}", error);
    }

    (status, Json(ApiResponse::error(error.to_string()))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        handle_error(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (AppError::operation_in_progress("aggregation"), StatusCode::CONFLICT),
            (WebError::missing_header("authorization").into(), StatusCode::UNAUTHORIZED),
            (WebError::invalid_auth("bad token").into(), StatusCode::FORBIDDEN),
            (AppError::not_found("playlist"), StatusCode::NOT_FOUND),
            (AppError::validation("bad input"), StatusCode::BAD_REQUEST),
            (AppError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(handle_error(error).status(), expected);
        }
    }
}
