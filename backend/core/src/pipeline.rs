//! Label scan pipeline.
//!
//! One scan walks `AwaitingInput → Extracting → Recognizing → Matching →
//! Retrieving → Done`, or drops to `Failed` at the first error. Nothing is
//! retried and no stage is skipped; empty OCR text still goes through
//! recognition and matching.

use std::sync::Arc;

use logging::{redact_sensitive_data, ScanEvent, ScanEventLogger};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{ScanError, ScanStage};
use crate::matching::MatchPolicy;
use crate::traits::{EntityRecognizer, TextExtractor};
use crate::types::{EntityHint, ExtractionResult, MatchResult, ScanReport};

/// Read-only collaborators and data shared by every scan.
#[derive(Clone)]
pub struct ScanPipeline {
    catalog: Arc<Catalog>,
    extractor: Arc<dyn TextExtractor>,
    recognizer: Arc<dyn EntityRecognizer>,
    policy: MatchPolicy,
}

impl ScanPipeline {
    pub fn new(
        catalog: Arc<Catalog>,
        extractor: Arc<dyn TextExtractor>,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Self {
        Self {
            catalog,
            extractor,
            recognizer,
            policy: MatchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn extractor_name(&self) -> &str {
        self.extractor.name()
    }

    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Run one scan. `image` is `None` when the request carried no image.
    #[instrument(skip_all, fields(request_id = %request_id))]
    pub async fn scan(
        &self,
        request_id: Uuid,
        image: Option<&[u8]>,
    ) -> Result<ScanReport, ScanError> {
        let result = self.run(request_id, image).await;
        match &result {
            Ok(report) => {
                transition(ScanStage::Done);
                ScanEventLogger::log_event(
                    request_id,
                    ScanEvent::Matched {
                        medicine_name: report.medicine_name.clone(),
                        score: report.score,
                    },
                );
            }
            Err(err) => {
                warn!(stage = %err.stage(), error = %err, "Scan failed");
                transition(ScanStage::Failed);
                ScanEventLogger::log_event(
                    request_id,
                    ScanEvent::Failed {
                        stage: err.stage().to_string(),
                        error_msg: err.to_string(),
                    },
                );
            }
        }
        result
    }

    async fn run(&self, request_id: Uuid, image: Option<&[u8]>) -> Result<ScanReport, ScanError> {
        transition(ScanStage::AwaitingInput);
        let image = image.ok_or(ScanError::MissingInput)?;

        transition(ScanStage::Extracting);
        let extraction = self.extract(image).await?;
        ScanEventLogger::log_event(
            request_id,
            ScanEvent::Extracted {
                text: extraction.raw_text.clone(),
            },
        );

        transition(ScanStage::Recognizing);
        let hint = self.recognize(&extraction).await?;
        ScanEventLogger::log_event(
            request_id,
            ScanEvent::Recognized {
                drug_name: hint.as_ref().map(|h| h.drug_name.clone()),
            },
        );

        transition(ScanStage::Matching);
        let matched = self.match_text(&extraction, hint).await?;

        transition(ScanStage::Retrieving);
        self.retrieve(extraction, matched)
    }

    async fn extract(&self, image: &[u8]) -> Result<ExtractionResult, ScanError> {
        let text = self
            .extractor
            .extract_text(image)
            .await
            .map_err(|e| ScanError::ExtractionFailed(redact_sensitive_data(&format!("{e:#}"))))?;
        let raw_text = text.trim().to_string();
        debug!(chars = raw_text.chars().count(), "Extracted label text");
        Ok(ExtractionResult { raw_text })
    }

    /// First `DRUG` entity, if any. Recognizer errors fail the scan.
    async fn recognize(
        &self,
        extraction: &ExtractionResult,
    ) -> Result<Option<EntityHint>, ScanError> {
        let entities = self
            .recognizer
            .recognize(&extraction.raw_text)
            .await
            .map_err(|e| ScanError::Internal {
                stage: ScanStage::Recognizing,
                message: redact_sensitive_data(&format!("{e:#}")),
                extracted_text: Some(extraction.raw_text.clone()),
            })?;

        Ok(entities
            .into_iter()
            .find(|e| e.is_drug())
            .map(|e| EntityHint { drug_name: e.text }))
    }

    /// Scoring walks every catalog record, so it runs on the blocking pool
    /// rather than a runtime worker.
    async fn match_text(
        &self,
        extraction: &ExtractionResult,
        hint: Option<EntityHint>,
    ) -> Result<MatchResult, ScanError> {
        let catalog = Arc::clone(&self.catalog);
        let policy = self.policy;
        let raw_text = extraction.raw_text.clone();

        tokio::task::spawn_blocking(move || policy.resolve(&raw_text, hint.as_ref(), &catalog))
            .await
            .map_err(|e| ScanError::Internal {
                stage: ScanStage::Matching,
                message: format!("matching task failed: {e}"),
                extracted_text: Some(extraction.raw_text.clone()),
            })?
    }

    fn retrieve(
        &self,
        extraction: ExtractionResult,
        matched: MatchResult,
    ) -> Result<ScanReport, ScanError> {
        let Some(record) = self.catalog.find_by_name(&matched.matched_name) else {
            return Err(ScanError::Internal {
                stage: ScanStage::Retrieving,
                message: format!("catalog record '{}' not found", matched.matched_name),
                extracted_text: Some(extraction.raw_text),
            });
        };
        Ok(ScanReport {
            extracted_text: extraction.raw_text,
            medicine_name: matched.matched_name,
            full_description: record.full_description.clone(),
            side_effects: record.side_effects.clone(),
            score: matched.score,
        })
    }
}

fn transition(stage: ScanStage) {
    debug!(stage = %stage, "Scan stage");
}
