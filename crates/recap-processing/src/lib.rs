//! Media processing: image compression, video frame sampling, and upload
//! validation.

pub mod error;
pub mod image;
pub mod validator;
pub mod video;

pub use crate::error::ProcessingError;
pub use crate::image::ImageCompressor;
pub use crate::validator::{sanitize_filename, UploadValidator, ValidationError};
pub use crate::video::{FrameSampler, VideoMetadata};
