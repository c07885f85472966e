//! Unified application error type.
//!
//! Domain crates carry their own `thiserror` enums; the API layer converts
//! them into `AppError` at the orchestration boundary, which keeps this enum
//! limited to the categories that actually cross crate seams.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("media processing error: {0}")]
    Processing(String),

    #[error("vision analysis error: {0}")]
    Vision(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("{message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON error: {}", err))
    }
}

impl AppError {
    /// Message safe to show to an end user; diagnostic detail stays in the log.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Processing(msg) => msg.clone(),
            AppError::Vision(_) => "Media analysis failed".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_internals() {
        let err = AppError::Internal("pool exhausted".to_string());
        assert_eq!(err.client_message(), "Internal server error");

        let err = AppError::Vision("401 from upstream".to_string());
        assert_eq!(err.client_message(), "Media analysis failed");
    }

    #[test]
    fn test_client_message_passes_through_input_errors() {
        let err = AppError::InvalidInput("bad extension".to_string());
        assert_eq!(err.client_message(), "bad extension");
    }

    #[test]
    fn test_from_io_error() {
        let err = AppError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
