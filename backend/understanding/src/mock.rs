use anyhow::{bail, Result};
use async_trait::async_trait;

use pillscan_core::{Entity, EntityRecognizer, TextExtractor};

/// OCR collaborator that returns canned text, or a canned error.
pub struct MockTextExtractor {
    text: String,
    error: Option<String>,
}

impl MockTextExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            error: Some(message.into()),
        }
    }
}

#[async_trait]
impl TextExtractor for MockTextExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract_text(&self, _image: &[u8]) -> Result<String> {
        match &self.error {
            Some(message) => bail!("{message}"),
            None => Ok(self.text.clone()),
        }
    }
}

/// NER collaborator that returns fixed entities, or a canned error.
pub struct MockRecognizer {
    entities: Vec<Entity>,
    error: Option<String>,
}

impl MockRecognizer {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            error: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            entities: Vec::new(),
            error: Some(message.into()),
        }
    }
}

#[async_trait]
impl EntityRecognizer for MockRecognizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(&self, _text: &str) -> Result<Vec<Entity>> {
        match &self.error {
            Some(message) => bail!("{message}"),
            None => Ok(self.entities.clone()),
        }
    }
}
