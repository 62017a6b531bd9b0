//! Remote NER model client.
//!
//! Talks to a spaCy-style model server (e.g. a Med7 pipeline behind a small
//! HTTP wrapper): `POST {"text": ...}` returns
//! `{"ents": [{"text", "label", "start", "end"}]}`.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pillscan_core::{Entity, EntityRecognizer};

pub struct HttpEntityRecognizer {
    client: Client,
    endpoint: String,
}

impl HttpEntityRecognizer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[derive(Serialize)]
struct NerRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct NerResponse {
    #[serde(default, alias = "entities")]
    ents: Vec<Entity>,
}

#[async_trait]
impl EntityRecognizer for HttpEntityRecognizer {
    fn name(&self) -> &str {
        "http"
    }

    async fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&NerRequest { text })
            .send()
            .await
            .context("NER service request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("NER service returned {}: {}", status, body);
        }

        let parsed: NerResponse = response
            .json()
            .await
            .context("Failed to parse NER service response")?;
        debug!(entities = parsed.ents.len(), "NER service response");
        Ok(parsed.ents)
    }
}
