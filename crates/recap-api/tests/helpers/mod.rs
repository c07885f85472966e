#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use sqlx::sqlite::SqlitePoolOptions;

use recap_api::ingest::{IngestService, UploadItem};
use recap_api::state::AppState;
use recap_core::config::default_allowed_extensions;
use recap_core::models::AnalysisResult;
use recap_core::Config;
use recap_db::MediaRepository;
use recap_processing::{FrameSampler, ImageCompressor, UploadValidator};
use recap_vision::{MediaAnalyzer, VisionError};

pub enum StubBehavior {
    AlwaysOk,
    FailAll,
    FailOnCall(usize),
}

/// In-process stand-in for the remote vision capability.
pub struct StubAnalyzer {
    behavior: StubBehavior,
    calls: AtomicUsize,
}

impl StubAnalyzer {
    pub fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaAnalyzer for StubAnalyzer {
    async fn analyze(&self, _image_data: &[u8]) -> Result<AnalysisResult, VisionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let fail = match self.behavior {
            StubBehavior::AlwaysOk => false,
            StubBehavior::FailAll => true,
            StubBehavior::FailOnCall(n) => call == n,
        };
        if fail {
            return Err(VisionError::Api {
                status: 500,
                body: "stub failure".to_string(),
            });
        }
        Ok(AnalysisResult {
            description: format!("analysis {}", call),
            tags: vec!["stub".to_string()],
            objects: Vec::new(),
            faces: 1,
        })
    }
}

pub async fn memory_repository() -> MediaRepository {
    // One connection so every query hits the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    recap_db::MIGRATOR.run(&pool).await.unwrap();
    MediaRepository::new(pool)
}

pub fn ingest_service(
    repository: MediaRepository,
    analyzer: Arc<dyn MediaAnalyzer>,
    temp_dir: PathBuf,
) -> IngestService {
    let compressor = ImageCompressor::default();
    IngestService::new(
        repository,
        analyzer,
        compressor,
        FrameSampler::new("ffmpeg".to_string(), "ffprobe".to_string(), None, compressor),
        UploadValidator::new(default_allowed_extensions()),
        temp_dir,
    )
}

pub fn test_config(temp_dir: PathBuf) -> Config {
    Config {
        server_port: 0,
        database_url: "sqlite::memory:".to_string(),
        upload_temp_dir: temp_dir,
        max_content_length: 16 * 1024 * 1024,
        allowed_extensions: default_allowed_extensions(),
        thumbnail_max_width: 800,
        thumbnail_max_height: 800,
        jpeg_quality: 85,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        frame_stride: None,
        vision_endpoint: None,
        vision_key: None,
    }
}

pub async fn test_state(analyzer: Arc<dyn MediaAnalyzer>, temp_dir: PathBuf) -> AppState {
    let repository = memory_repository().await;
    AppState::new(test_config(temp_dir), repository, analyzer).unwrap()
}

pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(64, 64, Rgb([200, 30, 90]));
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

pub fn png_item(filename: &str) -> UploadItem {
    UploadItem {
        data: png_bytes(),
        filename: filename.to_string(),
        content_type: "image/png".to_string(),
    }
}
