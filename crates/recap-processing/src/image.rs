//! Image compression: bounded, aspect-preserving resize + JPEG re-encode.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};

use crate::error::ProcessingError;

const DEFAULT_MAX_WIDTH: u32 = 800;
const DEFAULT_MAX_HEIGHT: u32 = 800;
const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Stateless image compressor.
///
/// Decodes arbitrary encoded image bytes, shrinks them so neither dimension
/// exceeds the configured bound (aspect ratio preserved, never upscales), and
/// re-encodes as JPEG at a fixed quality. Idempotent once within bounds:
/// further passes re-compress but do not change dimensions.
#[derive(Clone, Copy, Debug)]
pub struct ImageCompressor {
    max_width: u32,
    max_height: u32,
    quality: u8,
}

impl Default for ImageCompressor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT, DEFAULT_JPEG_QUALITY)
    }
}

impl ImageCompressor {
    pub fn new(max_width: u32, max_height: u32, quality: u8) -> Self {
        Self {
            max_width,
            max_height,
            quality,
        }
    }

    /// Compress encoded image bytes into bounded JPEG bytes.
    pub fn compress(&self, data: &[u8]) -> Result<Bytes, ProcessingError> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let img = reader.decode()?;

        let (width, height) = img.dimensions();
        let img = if width > self.max_width || height > self.max_height {
            img.resize(self.max_width, self.max_height, FilterType::Lanczos3)
        } else {
            img
        };

        self.encode_jpeg(&img)
    }

    fn encode_jpeg(&self, img: &DynamicImage) -> Result<Bytes, ProcessingError> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(self.quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb)?;
        let jpeg = comp.finish()?;

        Ok(Bytes::from(jpeg))
    }
}
