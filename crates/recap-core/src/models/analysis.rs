use serde::{Deserialize, Serialize};

/// Structured outcome of one remote vision analysis.
///
/// Persisted as a JSON blob on [`MediaRecord`](super::MediaRecord) and parsed
/// back with the same schema; stored content is never evaluated. The
/// description is an empty string, never absent, when the remote capability
/// produced no caption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub objects: Vec<String>,
    #[serde(default)]
    pub faces: u32,
}
