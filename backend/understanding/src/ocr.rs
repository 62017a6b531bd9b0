//! Optical Character Recognition (OCR) via Google Cloud Vision.
//!
//! Sends the image to `images:annotate` with `TEXT_DETECTION` and returns the
//! first text annotation, which Vision fills with the whole detected text.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pillscan_core::TextExtractor;

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// How requests to Vision are authenticated.
#[derive(Clone)]
pub enum VisionAuth {
    /// API key sent as the `key` query parameter.
    ApiKey(String),
    /// OAuth2 access token sent as a bearer header.
    AccessToken(String),
}

impl std::fmt::Debug for VisionAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisionAuth::ApiKey(_) => f.write_str("ApiKey(..)"),
            VisionAuth::AccessToken(_) => f.write_str("AccessToken(..)"),
        }
    }
}

pub struct GoogleVisionOcr {
    client: Client,
    auth: VisionAuth,
    endpoint: String,
}

impl GoogleVisionOcr {
    pub fn new(auth: VisionAuth) -> Self {
        Self {
            client: Client::new(),
            auth,
            endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a preconfigured client (timeouts, proxies).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Serialize)]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

fn annotate_request(image: &[u8]) -> AnnotateRequest {
    AnnotateRequest {
        requests: vec![ImageRequest {
            image: ImageContent {
                content: STANDARD.encode(image),
            },
            features: vec![Feature {
                kind: "TEXT_DETECTION",
            }],
        }],
    }
}

/// Aggregate text of the first image response; empty when nothing was detected.
fn detected_text(response: AnnotateResponse) -> Result<String> {
    let Some(first) = response.responses.into_iter().next() else {
        return Ok(String::new());
    };
    if let Some(status) = first.error {
        if !status.message.is_empty() {
            bail!("Google Vision API error: {}", status.message);
        }
    }
    Ok(first
        .text_annotations
        .into_iter()
        .next()
        .map(|a| a.description.trim().to_string())
        .unwrap_or_default())
}

#[async_trait]
impl TextExtractor for GoogleVisionOcr {
    fn name(&self) -> &str {
        "google_vision"
    }

    async fn extract_text(&self, image: &[u8]) -> Result<String> {
        info!(bytes = image.len(), "Running OCR via Google Vision");

        let mut request = self.client.post(&self.endpoint).json(&annotate_request(image));
        request = match &self.auth {
            VisionAuth::ApiKey(key) => request.query(&[("key", key)]),
            VisionAuth::AccessToken(token) => request.bearer_auth(token),
        };

        let response = request
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Google Vision HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Google Vision returned {}: {}", status, body);
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to parse Google Vision response")?;

        let text = detected_text(parsed)?;
        debug!(chars = text.chars().count(), "Google Vision detected text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AnnotateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(annotate_request(b"abc")).unwrap();
        assert_eq!(body["requests"][0]["image"]["content"], "YWJj");
        assert_eq!(body["requests"][0]["features"][0]["type"], "TEXT_DETECTION");
    }

    #[test]
    fn takes_first_annotation() {
        let resp = parse(
            r#"{"responses":[{"textAnnotations":[
                {"description":"Paracetamol\n500mg\n","locale":"en"},
                {"description":"Paracetamol"}
            ]}]}"#,
        );
        assert_eq!(detected_text(resp).unwrap(), "Paracetamol\n500mg");
    }

    #[test]
    fn no_annotations_is_empty_text() {
        assert_eq!(detected_text(parse(r#"{"responses":[{}]}"#)).unwrap(), "");
        assert_eq!(detected_text(parse(r#"{}"#)).unwrap(), "");
    }

    #[test]
    fn api_error_message_fails_extraction() {
        let resp = parse(r#"{"responses":[{"error":{"code":3,"message":"Bad image data."}}]}"#);
        let err = detected_text(resp).unwrap_err();
        assert_eq!(err.to_string(), "Google Vision API error: Bad image data.");
    }

    #[test]
    fn auth_debug_hides_secret() {
        let auth = VisionAuth::ApiKey("super-secret".into());
        assert!(!format!("{auth:?}").contains("super-secret"));
    }
}
