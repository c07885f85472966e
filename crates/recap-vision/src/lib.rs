//! Remote vision analysis client.
//!
//! Wraps the Azure Computer Vision `analyze` REST endpoint: submit compressed
//! image bytes, receive a caption, tags, detected objects, and a face count.
//! The client is constructed once at startup and injected where needed as an
//! `Arc<dyn MediaAnalyzer>`; construction fails fast when credentials are
//! missing, before any network traffic.

use std::time::Duration;

use async_trait::async_trait;

use recap_core::models::AnalysisResult;

mod response;

use response::AnalyzeResponse;

const ANALYZE_PATH: &str = "/vision/v3.2/analyze";
const VISUAL_FEATURES: &str = "Tags,Description,Objects,Faces";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("vision API endpoint and key must be configured")]
    Configuration,

    #[error("vision request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("vision API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed vision API response: {0}")]
    Malformed(String),
}

/// The remote analysis capability, behind a trait so the ingestion layer can
/// be exercised without network access.
#[async_trait]
pub trait MediaAnalyzer: Send + Sync {
    async fn analyze(&self, image_data: &[u8]) -> Result<AnalysisResult, VisionError>;
}

/// Endpoint and credential for the remote capability.
#[derive(Clone, Debug, Default)]
pub struct VisionConfig {
    pub endpoint: String,
    pub key: String,
}

pub struct VisionClient {
    http_client: reqwest::Client,
    endpoint: String,
    key: String,
}

impl VisionClient {
    /// Fails with [`VisionError::Configuration`] when endpoint or key is
    /// missing; no network call is made here.
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        if config.endpoint.trim().is_empty() || config.key.trim().is_empty() {
            return Err(VisionError::Configuration);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            key: config.key,
        })
    }
}

#[async_trait]
impl MediaAnalyzer for VisionClient {
    async fn analyze(&self, image_data: &[u8]) -> Result<AnalysisResult, VisionError> {
        let url = format!("{}{}", self.endpoint, ANALYZE_PATH);

        let response = self
            .http_client
            .post(&url)
            .query(&[("visualFeatures", VISUAL_FEATURES)])
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header("Content-Type", "application/octet-stream")
            .body(image_data.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(VisionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let analysis: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Malformed(e.to_string()))?;
        let result = analysis.into_result();

        tracing::debug!(
            tags = result.tags.len(),
            objects = result.objects.len(),
            faces = result.faces,
            has_caption = !result.description.is_empty(),
            "Vision analysis completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::Server) -> VisionClient {
        VisionClient::new(VisionConfig {
            endpoint: server.url(),
            key: "test-key".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_new_requires_endpoint_and_key() {
        let missing_key = VisionClient::new(VisionConfig {
            endpoint: "https://example.cognitiveservices.azure.com".to_string(),
            key: "  ".to_string(),
        });
        assert!(matches!(missing_key, Err(VisionError::Configuration)));

        let missing_endpoint = VisionClient::new(VisionConfig {
            endpoint: String::new(),
            key: "k".to_string(),
        });
        assert!(matches!(missing_endpoint, Err(VisionError::Configuration)));
    }

    #[tokio::test]
    async fn test_analyze_extracts_all_features() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/vision/v3.2/analyze")
            .match_query(mockito::Matcher::UrlEncoded(
                "visualFeatures".into(),
                "Tags,Description,Objects,Faces".into(),
            ))
            .match_header("ocp-apim-subscription-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "description": {"captions": [{"text": "a dog on a beach", "confidence": 0.92}]},
                    "tags": [{"name": "dog", "confidence": 0.99}, {"name": "beach", "confidence": 0.87}],
                    "objects": [{"object": "dog", "confidence": 0.8, "rectangle": {"x": 1, "y": 2, "w": 3, "h": 4}}],
                    "faces": [{"age": 30}, {"age": 4}]
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.analyze(b"jpeg bytes").await.unwrap();

        assert_eq!(result.description, "a dog on a beach");
        assert_eq!(result.tags, vec!["dog", "beach"]);
        assert_eq!(result.objects, vec!["dog"]);
        assert_eq!(result.faces, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_analyze_without_captions_yields_empty_description() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/vision/v3.2/analyze")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"description": {"captions": []}, "tags": [], "objects": [], "faces": []}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.analyze(b"jpeg bytes").await.unwrap();

        assert_eq!(result.description, "");
        assert_eq!(result.faces, 0);
    }

    #[tokio::test]
    async fn test_analyze_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/vision/v3.2/analyze")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_body("Access denied")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.analyze(b"jpeg bytes").await;

        match result {
            Err(VisionError::Api { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Access denied"));
            }
            other => panic!("expected Api error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_analyze_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/vision/v3.2/analyze")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.analyze(b"jpeg bytes").await;
        assert!(matches!(result, Err(VisionError::Malformed(_))));
    }
}
