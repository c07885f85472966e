//! HTTP error response conversion.
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; domain errors
//! become [`AppError`] at the orchestration boundary and render here with a
//! consistent status and JSON body. `HttpAppError` exists because of the
//! orphan rule: `IntoResponse` cannot be implemented for `AppError` directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use recap_core::AppError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::InvalidInput(_) | AppError::Processing(_) => StatusCode::BAD_REQUEST,
            AppError::Vision(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.client_message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = HttpAppError(AppError::InvalidInput("nope".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = HttpAppError(AppError::Internal("boom".into()));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let err = HttpAppError(AppError::Vision("upstream".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
