//! JSON error envelope for handlers.

use std::borrow::Cow;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nagari_core::attachment::AttachmentError;
use nagari_db::repositories::{PostError, UserError};
use nagari_shared::AppError;
use serde_json::json;
use tracing::error;

/// Error returned by handlers, rendered as `{"error": code, "message": msg}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: Cow<'static, str>,
    message: String,
}

impl ApiError {
    /// Create an error with an explicit status and code.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code: Cow::Borrowed(code),
            message: message.into(),
        }
    }

    /// 400 with a specific error code.
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = Cow::Owned(err.error_code().to_ascii_lowercase());

        // Server-side details stay in the logs.
        let message = if err.is_server_error() {
            error!(error = %err, "Request failed");
            "An error occurred".to_string()
        } else {
            match err {
                AppError::NotFound(msg)
                | AppError::Validation(msg)
                | AppError::Conflict(msg)
                | AppError::Database(msg)
                | AppError::Storage(msg)
                | AppError::Internal(msg) => msg,
            }
        };

        Self {
            status,
            code,
            message,
        }
    }
}

impl From<AttachmentError> for ApiError {
    fn from(err: AttachmentError) -> Self {
        AppError::from(err).into()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        AppError::from(err).into()
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        AppError::from(err).into()
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message
            })),
        )
            .into_response()
    }
}
