//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

const DEFAULT_SERVER_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://recap.db?mode=rwc";
const DEFAULT_UPLOAD_TEMP_DIR: &str = "temp_uploads";
const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;
const DEFAULT_THUMBNAIL_BOUND: u32 = 800;
const DEFAULT_JPEG_QUALITY: u8 = 85;
const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
const DEFAULT_FFPROBE_PATH: &str = "ffprobe";

/// Application configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    /// Directory uploaded items are spooled to while a batch is processed.
    pub upload_temp_dir: PathBuf,
    /// Maximum accepted request body size in bytes.
    pub max_content_length: usize,
    /// Lowercased filename extensions accepted for upload.
    pub allowed_extensions: Vec<String>,
    pub thumbnail_max_width: u32,
    pub thumbnail_max_height: u32,
    pub jpeg_quality: u8,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// Overrides the fps-derived frame sampling stride when set.
    pub frame_stride: Option<u32>,
    pub vision_endpoint: Option<String>,
    pub vision_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_port: parse_var("SERVER_PORT")?.unwrap_or(DEFAULT_SERVER_PORT),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            upload_temp_dir: env::var("UPLOAD_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_TEMP_DIR)),
            max_content_length: parse_var("MAX_CONTENT_LENGTH")?
                .unwrap_or(DEFAULT_MAX_CONTENT_LENGTH),
            allowed_extensions: env::var("ALLOWED_EXTENSIONS")
                .map(|raw| parse_extensions(&raw))
                .unwrap_or_else(|_| default_allowed_extensions()),
            thumbnail_max_width: parse_var("THUMBNAIL_MAX_WIDTH")?
                .unwrap_or(DEFAULT_THUMBNAIL_BOUND),
            thumbnail_max_height: parse_var("THUMBNAIL_MAX_HEIGHT")?
                .unwrap_or(DEFAULT_THUMBNAIL_BOUND),
            jpeg_quality: parse_var("JPEG_QUALITY")?.unwrap_or(DEFAULT_JPEG_QUALITY),
            ffmpeg_path: env::var("FFMPEG_PATH")
                .unwrap_or_else(|_| DEFAULT_FFMPEG_PATH.to_string()),
            ffprobe_path: env::var("FFPROBE_PATH")
                .unwrap_or_else(|_| DEFAULT_FFPROBE_PATH.to_string()),
            frame_stride: parse_var("RECAP_FRAME_STRIDE")?,
            vision_endpoint: env::var("AZURE_VISION_ENDPOINT").ok(),
            vision_key: env::var("AZURE_VISION_KEY").ok(),
        })
    }
}

/// Extensions accepted when `ALLOWED_EXTENSIONS` is unset.
pub fn default_allowed_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif", "mp4", "mov", "avi"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("invalid {}: {}", name, e)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowed_extensions() {
        let exts = default_allowed_extensions();
        assert!(exts.contains(&"jpg".to_string()));
        assert!(exts.contains(&"mov".to_string()));
        assert_eq!(exts.len(), 7);
    }

    #[test]
    fn test_parse_extensions_normalizes() {
        let exts = parse_extensions(" PNG, .jpg ,webm,, ");
        assert_eq!(exts, vec!["png", "jpg", "webm"]);
    }

    #[test]
    fn test_parse_extensions_empty_input() {
        assert!(parse_extensions("").is_empty());
        assert!(parse_extensions(" , ,").is_empty());
    }
}
