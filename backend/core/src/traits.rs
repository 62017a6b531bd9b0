use anyhow::Result;
use async_trait::async_trait;

use crate::types::Entity;

/// OCR collaborator: turns image bytes into text.
///
/// Implementations return the aggregate text of the image, or an error whose
/// message is shown to the caller.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Provider name (e.g., "google_vision").
    fn name(&self) -> &str;

    async fn extract_text(&self, image: &[u8]) -> Result<String>;
}

/// NER collaborator: finds labelled spans (drug names, strengths, ...) in text.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Provider name (e.g., "rules", "http").
    fn name(&self) -> &str;

    async fn recognize(&self, text: &str) -> Result<Vec<Entity>>;
}
