//! Multipart upload handler.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use recap_core::AppError;

use crate::error::HttpAppError;
use crate::ingest::UploadItem;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    fn success(redirect: &str) -> Self {
        Self {
            success: true,
            redirect: Some(redirect.to_string()),
            error: None,
        }
    }

    fn failure(error: &str) -> Self {
        Self {
            success: false,
            redirect: None,
            error: Some(error.to_string()),
        }
    }
}

/// Accepts repeated `media` fields; per-item failures are logged and skipped,
/// and the response reports overall success when at least one record landed.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let mut items = Vec::new();
    let mut saw_media_field = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
    {
        if field.name() != Some("media") {
            continue;
        }
        saw_media_field = true;

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        if filename.is_empty() {
            continue;
        }
        items.push(UploadItem {
            data: data.to_vec(),
            filename,
            content_type,
        });
    }

    if !saw_media_field {
        return Ok(Json(UploadResponse::failure("No file part")));
    }
    if items.is_empty() {
        return Ok(Json(UploadResponse::failure("No selected file")));
    }

    let outcome = state.ingest.process_batch(items).await?;

    if outcome.any_stored() {
        Ok(Json(UploadResponse::success("/results")))
    } else {
        Ok(Json(UploadResponse::failure(
            "No files were successfully processed",
        )))
    }
}
