//! Video frame sampling via ffmpeg/ffprobe subprocesses.
//!
//! The container is probed for its declared frame rate, frames are decoded in
//! native order as raw rgb24, and roughly one frame per second is selected,
//! PNG-encoded, and handed to the [`ImageCompressor`].

use std::io::Cursor;
use std::path::Path;
use std::process::Stdio;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, RgbImage};
use serde::Deserialize;
use tokio::process::Command;

use crate::error::ProcessingError;
use crate::image::ImageCompressor;

/// Stride used when the container declares no usable frame rate.
const FALLBACK_STRIDE: u32 = 30;

/// Dimensions and declared rate of the first video stream.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct FrameSampler {
    ffmpeg_path: String,
    ffprobe_path: String,
    stride_override: Option<u32>,
    compressor: ImageCompressor,
}

impl FrameSampler {
    pub fn new(
        ffmpeg_path: String,
        ffprobe_path: String,
        stride_override: Option<u32>,
        compressor: ImageCompressor,
    ) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            stride_override,
            compressor,
        }
    }

    /// Probe the container for stream dimensions and declared frame rate.
    pub async fn probe(&self, video_path: &Path) -> Result<VideoMetadata, ProcessingError> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(video_path)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(ProcessingError::VideoOpen(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let probe: ProbeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| ProcessingError::VideoOpen(format!("unreadable probe output: {}", e)))?;
        let stream = probe
            .streams
            .into_iter()
            .next()
            .ok_or_else(|| ProcessingError::VideoOpen("no video stream".to_string()))?;

        let (width, height) = match (stream.width, stream.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(ProcessingError::VideoOpen(
                    "video stream has no dimensions".to_string(),
                ))
            }
        };

        let fps = stream
            .avg_frame_rate
            .as_deref()
            .and_then(parse_frame_rate)
            .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate));

        Ok(VideoMetadata { width, height, fps })
    }

    /// Decode the video and return compressed JPEG bytes for every selected
    /// frame, in temporal order. An empty sequence is a valid outcome.
    pub async fn sample(&self, video_path: &Path) -> Result<Vec<Bytes>, ProcessingError> {
        let meta = self.probe(video_path).await?;
        let stride = self.effective_stride(meta.fps);

        tracing::debug!(
            path = %video_path.display(),
            width = meta.width,
            height = meta.height,
            fps = ?meta.fps,
            stride,
            "Sampling video frames"
        );

        let output = Command::new(&self.ffmpeg_path)
            .args(["-v", "error", "-i"])
            .arg(video_path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(ProcessingError::VideoOpen(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let frames = select_frames(&output.stdout, meta.width, meta.height, stride);

        let mut compressed = Vec::with_capacity(frames.len());
        for frame in &frames {
            let png = encode_png(frame)?;
            compressed.push(self.compressor.compress(&png)?);
        }

        tracing::debug!(selected = compressed.len(), "Video frames sampled");
        Ok(compressed)
    }

    /// Sampling stride: explicit override, else round(declared fps), else a
    /// one-per-second approximation assuming ~30 fps.
    pub fn effective_stride(&self, fps: Option<f64>) -> u32 {
        self.stride_override.unwrap_or_else(|| sample_stride(fps))
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
}

/// Parse an ffprobe rational like "30000/1001" (or a plain number).
fn parse_frame_rate(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let value = match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => raw.parse().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

fn sample_stride(fps: Option<f64>) -> u32 {
    match fps {
        Some(fps) => (fps.round() as u32).max(1),
        None => FALLBACK_STRIDE,
    }
}

/// Chunk a raw rgb24 byte stream into frames and keep every `stride`-th one
/// (indices 0, stride, 2*stride, ...). A trailing partial frame is discarded.
fn select_frames(raw: &[u8], width: u32, height: u32, stride: u32) -> Vec<RgbImage> {
    let frame_size = width as usize * height as usize * 3;
    if frame_size == 0 {
        return Vec::new();
    }

    raw.chunks_exact(frame_size)
        .step_by(stride.max(1) as usize)
        .filter_map(|chunk| RgbImage::from_raw(width, height, chunk.to_vec()))
        .collect()
}

fn encode_png(frame: &RgbImage) -> Result<Vec<u8>, ProcessingError> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(frame.clone())
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}
