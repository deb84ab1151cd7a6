//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`lus_core::Error`] so that route handlers
//! can return `Result<T, AppError>` directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError(lus_core::Error);

impl From<lus_core::Error> for AppError {
    fn from(e: lus_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.0,
                "Server error in API handler"
            );
        }

        let code = match &self.0 {
            lus_core::Error::NotFound { .. } => "not_found",
            lus_core::Error::Unauthorized(_) => "unauthorized",
            lus_core::Error::Forbidden(_) => "forbidden",
            lus_core::Error::Validation(_) => "validation_error",
            lus_core::Error::Conflict(_) => "conflict",
            lus_core::Error::Database { .. } => "database_error",
            lus_core::Error::Io { .. } => "io_error",
            lus_core::Error::Drive { .. } => "drive_error",
            lus_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.0.to_string(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_produces_404() {
        let err = AppError::from(lus_core::Error::not_found("patient", "Patient_9"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthorized_produces_401() {
        let err = AppError::from(lus_core::Error::Unauthorized("bad password".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn conflict_produces_400() {
        let err = AppError::from(lus_core::Error::Conflict("taken".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn forbidden_produces_403() {
        let err = AppError::from(lus_core::Error::Forbidden("wrong password".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
