use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Media kind, a closed set. Anything outside it is rejected at
/// classification time rather than silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify by declared content-type prefix. `None` means the type is
    /// outside the supported set and the item must be rejected explicitly.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let normalized = content_type.trim().to_ascii_lowercase();
        if normalized.starts_with("image/") {
            Some(MediaKind::Image)
        } else if normalized.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// One persisted analysis outcome. Insert-only: never mutated or deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MediaRecord {
    pub id: i64,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    /// JSON-serialized [`AnalysisResult`](super::AnalysisResult), if any.
    pub analysis_result: Option<String>,
    pub media_type: MediaKind,
    pub processed: bool,
}

/// A staged record, built after a successful per-item analysis and committed
/// with the rest of its batch in a single transaction.
#[derive(Debug, Clone)]
pub struct NewMediaRecord {
    pub filename: String,
    pub media_type: MediaKind,
    pub analysis_result: Option<String>,
    pub processed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_content_type_prefixes() {
        assert_eq!(
            MediaKind::from_content_type("image/jpeg"),
            Some(MediaKind::Image)
        );
        assert_eq!(
            MediaKind::from_content_type("video/quicktime"),
            Some(MediaKind::Video)
        );
        assert_eq!(
            MediaKind::from_content_type("IMAGE/PNG"),
            Some(MediaKind::Image)
        );
    }

    #[test]
    fn test_from_content_type_rejects_everything_else() {
        assert_eq!(MediaKind::from_content_type("application/pdf"), None);
        assert_eq!(MediaKind::from_content_type("audio/mpeg"), None);
        assert_eq!(MediaKind::from_content_type(""), None);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&MediaKind::Video).unwrap(),
            "\"video\""
        );
    }
}
