//! Batch ingestion: validate, spool, classify, analyze, and persist uploads.
//!
//! Items in a batch are processed strictly sequentially. Per-item failures
//! are logged and skip that item; the records staged by the surviving items
//! are committed in one transaction after the whole batch has been walked.

use std::path::PathBuf;
use std::sync::Arc;

use recap_core::models::{MediaKind, NewMediaRecord};
use recap_core::{AppError, Config};
use recap_db::MediaRepository;
use recap_processing::{
    sanitize_filename, FrameSampler, ImageCompressor, UploadValidator, ValidationError,
};
use recap_vision::MediaAnalyzer;

/// One uploaded item as received from the multipart form.
#[derive(Clone, Debug)]
pub struct UploadItem {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// What happened to a batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchOutcome {
    /// Records committed to the database.
    pub stored: usize,
    /// Items the batch contained.
    pub attempted: usize,
}

impl BatchOutcome {
    pub fn any_stored(&self) -> bool {
        self.stored > 0
    }
}

pub struct IngestService {
    repository: MediaRepository,
    analyzer: Arc<dyn MediaAnalyzer>,
    compressor: ImageCompressor,
    sampler: FrameSampler,
    validator: UploadValidator,
    temp_dir: PathBuf,
}

impl IngestService {
    pub fn new(
        repository: MediaRepository,
        analyzer: Arc<dyn MediaAnalyzer>,
        compressor: ImageCompressor,
        sampler: FrameSampler,
        validator: UploadValidator,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            repository,
            analyzer,
            compressor,
            sampler,
            validator,
            temp_dir,
        }
    }

    pub fn from_config(
        config: &Config,
        repository: MediaRepository,
        analyzer: Arc<dyn MediaAnalyzer>,
    ) -> Self {
        let compressor = ImageCompressor::new(
            config.thumbnail_max_width,
            config.thumbnail_max_height,
            config.jpeg_quality,
        );
        let sampler = FrameSampler::new(
            config.ffmpeg_path.clone(),
            config.ffprobe_path.clone(),
            config.frame_stride,
            compressor,
        );
        let validator = UploadValidator::new(config.allowed_extensions.clone());
        Self::new(
            repository,
            analyzer,
            compressor,
            sampler,
            validator,
            config.upload_temp_dir.clone(),
        )
    }

    /// Process a batch and commit every staged record in one transaction.
    /// Sibling items are unaffected by a per-item failure.
    pub async fn process_batch(&self, items: Vec<UploadItem>) -> Result<BatchOutcome, AppError> {
        let attempted = items.len();
        let mut staged = Vec::new();

        for item in items {
            let filename = item.filename.clone();
            match self.process_item(item).await {
                Ok(Some(record)) => staged.push(record),
                Ok(None) => {
                    tracing::warn!(filename = %filename, "No analyzable content, skipping item");
                }
                Err(err) => {
                    tracing::error!(filename = %filename, error = %err, "Failed to process item");
                }
            }
        }

        let stored = staged.len();
        self.repository.insert_batch(&staged).await?;

        tracing::info!(stored, attempted, "Upload batch finished");
        Ok(BatchOutcome { stored, attempted })
    }

    /// Returns the staged record, or `None` when the item produced nothing to
    /// analyze (a video with zero sampled frames).
    async fn process_item(&self, item: UploadItem) -> Result<Option<NewMediaRecord>, AppError> {
        if item.data.is_empty() {
            return Err(AppError::InvalidInput(ValidationError::EmptyFile.to_string()));
        }
        self.validator
            .validate_extension(&item.filename)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let filename = sanitize_filename(&item.filename);

        // Scoped spool file: deleted on drop, on every exit path below.
        let temp = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(&self.temp_dir)?;
        tokio::fs::write(temp.path(), &item.data).await?;

        let kind = MediaKind::from_content_type(&item.content_type).ok_or_else(|| {
            AppError::InvalidInput(
                ValidationError::UnsupportedContentType(item.content_type.clone()).to_string(),
            )
        })?;

        let analysis = match kind {
            MediaKind::Image => {
                let compressed = self
                    .compressor
                    .compress(&item.data)
                    .map_err(|e| AppError::Processing(e.to_string()))?;
                self.analyzer
                    .analyze(&compressed)
                    .await
                    .map_err(|e| AppError::Vision(e.to_string()))?
            }
            MediaKind::Video => {
                let frames = self
                    .sampler
                    .sample(temp.path())
                    .await
                    .map_err(|e| AppError::Processing(e.to_string()))?;
                match frames.first() {
                    // Only the first sampled frame is analyzed; the rest are
                    // sampled for ordering guarantees but not submitted.
                    Some(first) => self
                        .analyzer
                        .analyze(first)
                        .await
                        .map_err(|e| AppError::Vision(e.to_string()))?,
                    None => return Ok(None),
                }
            }
        };

        let blob = serde_json::to_string(&analysis)?;
        Ok(Some(NewMediaRecord {
            filename,
            media_type: kind,
            analysis_result: Some(blob),
            processed: true,
        }))
    }
}
