#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to open video: {0}")]
    VideoOpen(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
