//! Wire model for the analyze endpoint response.

use serde::Deserialize;

use recap_core::models::AnalysisResult;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnalyzeResponse {
    #[serde(default)]
    description: DescriptionBlock,
    #[serde(default)]
    tags: Vec<TagAnnotation>,
    #[serde(default)]
    objects: Vec<ObjectAnnotation>,
    #[serde(default)]
    faces: Vec<FaceAnnotation>,
}

#[derive(Debug, Default, Deserialize)]
struct DescriptionBlock {
    #[serde(default)]
    captions: Vec<Caption>,
}

#[derive(Debug, Deserialize)]
struct Caption {
    #[serde(default)]
    text: String,
    #[serde(default)]
    #[allow(dead_code)]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct TagAnnotation {
    name: String,
    #[serde(default)]
    #[allow(dead_code)]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct ObjectAnnotation {
    #[serde(rename = "object")]
    label: String,
}

/// Only the presence of a face matters here; the service reports more.
#[derive(Debug, Deserialize)]
struct FaceAnnotation {}

impl AnalyzeResponse {
    /// Flatten the remote shape into the persisted result: first caption (or
    /// empty string), all tag names, all object labels, face count.
    pub(crate) fn into_result(self) -> AnalysisResult {
        AnalysisResult {
            description: self
                .description
                .captions
                .into_iter()
                .next()
                .map(|c| c.text)
                .unwrap_or_default(),
            tags: self.tags.into_iter().map(|t| t.name).collect(),
            objects: self.objects.into_iter().map(|o| o.label).collect(),
            faces: self.faces.len() as u32,
        }
    }
}
