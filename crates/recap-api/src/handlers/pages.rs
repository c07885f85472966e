//! HTML page handlers: the upload form and the results listing.

use std::sync::Arc;

use axum::{extract::State, response::Html};
use serde::Serialize;
use serde_json::json;

use recap_core::models::{AnalysisResult, MediaRecord};
use recap_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::summary::generate_yearly_summary;

/// Flattened record for template rendering.
#[derive(Debug, Serialize)]
struct RecordView {
    id: i64,
    filename: String,
    upload_date: String,
    media_type: &'static str,
    description: String,
    tags: Vec<String>,
    objects: Vec<String>,
    faces: u32,
}

impl RecordView {
    fn from_record(record: &MediaRecord) -> Self {
        let analysis = record
            .analysis_result
            .as_deref()
            .and_then(|blob| serde_json::from_str::<AnalysisResult>(blob).ok())
            .unwrap_or_default();

        Self {
            id: record.id,
            filename: record.filename.clone(),
            upload_date: record.upload_date.format("%Y-%m-%d %H:%M").to_string(),
            media_type: record.media_type.as_str(),
            description: analysis.description,
            tags: analysis.tags,
            objects: analysis.objects,
            faces: analysis.faces,
        }
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, HttpAppError> {
    let body = state
        .templates
        .render("index", &json!({}))
        .map_err(|e| AppError::Internal(format!("template render failed: {}", e)))?;
    Ok(Html(body))
}

pub async fn results(State(state): State<Arc<AppState>>) -> Result<Html<String>, HttpAppError> {
    let records = state.repository.list_all().await?;
    let summary = generate_yearly_summary(&records);
    let views: Vec<RecordView> = records.iter().map(RecordView::from_record).collect();

    let body = state
        .templates
        .render("results", &json!({ "summary": summary, "records": views }))
        .map_err(|e| AppError::Internal(format!("template render failed: {}", e)))?;
    Ok(Html(body))
}
