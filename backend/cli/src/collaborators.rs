//! Builds the OCR and NER collaborators selected in the config.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::info;

use pillscan_config::{NerProviderKind, OcrProviderKind, PillScanConfig};
use pillscan_core::{EntityRecognizer, TextExtractor};
use pillscan_understanding::{
    GoogleVisionOcr, HttpEntityRecognizer, MockTextExtractor, NoopRecognizer,
    RuleBasedRecognizer, VisionAuth,
};

fn http_client(timeout_secs: Option<u64>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

pub fn build_extractor(config: &PillScanConfig) -> Result<Arc<dyn TextExtractor>> {
    let ocr = config.ocr.clone().unwrap_or_default();

    match ocr.provider.unwrap_or_default() {
        OcrProviderKind::GoogleVision => {
            // An API key wins when both credentials are set.
            let auth = match (ocr.api_key, ocr.access_token) {
                (Some(key), _) => VisionAuth::ApiKey(key),
                (None, Some(token)) => VisionAuth::AccessToken(token),
                (None, None) => bail!("Google Vision needs ocr.apiKey or ocr.accessToken"),
            };
            let mut vision =
                GoogleVisionOcr::new(auth).with_client(http_client(ocr.timeout_secs)?);
            if let Some(endpoint) = ocr.endpoint {
                vision = vision.with_endpoint(endpoint);
            }
            info!("Using Google Vision OCR");
            Ok(Arc::new(vision))
        }
        OcrProviderKind::Mock => {
            info!("Using mock OCR");
            Ok(Arc::new(MockTextExtractor::new(
                ocr.mock_text.unwrap_or_default(),
            )))
        }
    }
}

pub fn build_recognizer(config: &PillScanConfig) -> Result<Arc<dyn EntityRecognizer>> {
    let ner = config.ner.clone().unwrap_or_default();

    match ner.provider.unwrap_or_default() {
        NerProviderKind::Rules => {
            info!(extra_terms = ner.extra_drug_terms.len(), "Using rule-based NER");
            Ok(Arc::new(
                RuleBasedRecognizer::new().with_terms(&ner.extra_drug_terms),
            ))
        }
        NerProviderKind::Http => {
            let Some(endpoint) = ner.endpoint else {
                bail!("ner.endpoint is required for the http provider");
            };
            info!(endpoint = %endpoint, "Using HTTP NER");
            Ok(Arc::new(
                HttpEntityRecognizer::new(endpoint).with_client(http_client(ner.timeout_secs)?),
            ))
        }
        NerProviderKind::None => {
            info!("NER disabled");
            Ok(Arc::new(NoopRecognizer))
        }
    }
}
