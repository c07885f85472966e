//! Upload validation: extension allow-list and filename sanitation.

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("empty file")]
    EmptyFile,
}

/// Validates uploaded filenames against an extension allow-list.
pub struct UploadValidator {
    allowed_extensions: Vec<String>,
}

impl UploadValidator {
    pub fn new(allowed_extensions: Vec<String>) -> Self {
        Self { allowed_extensions }
    }

    /// Case-insensitive match on the substring after the last dot. Filenames
    /// without an extension are rejected.
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }
}

/// Reduce a user-supplied filename to a safe storage key: basename only,
/// characters outside [alphanumeric . - _] replaced, length capped.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    let path = Path::new(filename);
    let base = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim().is_empty() || s.len() < 3 {
        "file".to_string()
    } else {
        s
    }
}
