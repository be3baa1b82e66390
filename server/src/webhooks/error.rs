//! Webhook Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::db::BackendError;
use crate::permissions::Permission;

/// Coarse error kind exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    NotFound,
    PermissionDenied,
    StoreFailure,
}

/// Webhook management errors.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Malformed or missing request input.
    #[error("Invalid or missing parameter: {0}")]
    InvalidParameter(String),

    #[error("Channel not found")]
    ChannelNotFound,

    #[error("Team not found")]
    TeamNotFound,

    #[error("Incoming webhook not found")]
    HookNotFound,

    /// Caller lacks the named permission.
    #[error("Missing permission: {0}")]
    PermissionDenied(Permission),

    /// A collaborator backend failed; the backend error is kept as the source.
    #[error("Store failure")]
    StoreFailure(#[from] BackendError),
}

impl WebhookError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::ChannelNotFound | Self::TeamNotFound | Self::HookNotFound => ErrorKind::NotFound,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::StoreFailure(_) => ErrorKind::StoreFailure,
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
            Self::ChannelNotFound => "CHANNEL_NOT_FOUND",
            Self::TeamNotFound => "TEAM_NOT_FOUND",
            Self::HookNotFound => "HOOK_NOT_FOUND",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::StoreFailure(_) => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidParameter => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::StoreFailure(e) => {
                tracing::error!(error = %e, "Webhook backend error");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(ErrorResponse {
            error: self.code().to_string(),
            message,
        });

        (self.status(), body).into_response()
    }
}
