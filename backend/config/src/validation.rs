//! Config validation: field checks with user-friendly messages.

use crate::schema::{NerProviderKind, OcrProviderKind, PillScanConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &PillScanConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_catalog(config, &mut report);
    validate_ocr(config, &mut report);
    validate_ner(config, &mut report);
    validate_matching(config, &mut report);
    report
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn validate_server(config: &PillScanConfig, report: &mut ValidationReport) {
    if config.max_upload_bytes() == 0 {
        report.error("server.maxUploadBytes", "Must be greater than zero");
    }
}

fn validate_catalog(config: &PillScanConfig, report: &mut ValidationReport) {
    let path = config.catalog_path();
    if !path.exists() {
        report.warn(
            "catalog.path",
            format!("Catalog file not found: {}", path.display()),
        );
    }
}

/// Google Vision needs an API key or an access token.
fn validate_ocr(config: &PillScanConfig, report: &mut ValidationReport) {
    let Some(ocr) = &config.ocr else { return };
    let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

    match ocr.provider.unwrap_or_default() {
        OcrProviderKind::GoogleVision => {
            match (has(&ocr.api_key), has(&ocr.access_token)) {
                (false, false) => report.error(
                    "ocr",
                    "Google Vision requires `apiKey` or `accessToken`",
                ),
                (true, true) => report.warn(
                    "ocr.accessToken",
                    "Both apiKey and accessToken set; apiKey is used",
                ),
                _ => {}
            }
        }
        OcrProviderKind::Mock => {
            report.warn("ocr.provider", "Mock OCR returns the same text for every image");
        }
    }

    if let Some(endpoint) = &ocr.endpoint {
        if !is_http_url(endpoint) {
            report.error("ocr.endpoint", format!("Not an http(s) URL: {endpoint}"));
        }
    }
    if ocr.timeout_secs == Some(0) {
        report.error("ocr.timeoutSecs", "Must be greater than zero");
    }
}

fn validate_ner(config: &PillScanConfig, report: &mut ValidationReport) {
    let Some(ner) = &config.ner else { return };

    match ner.provider.unwrap_or_default() {
        NerProviderKind::Http => match &ner.endpoint {
            None => report.error("ner.endpoint", "HTTP NER provider requires an endpoint"),
            Some(e) if !is_http_url(e) => {
                report.error("ner.endpoint", format!("Not an http(s) URL: {e}"))
            }
            Some(_) => {}
        },
        NerProviderKind::None if !ner.extra_drug_terms.is_empty() => {
            report.warn(
                "ner.extraDrugTerms",
                "Ignored when the NER provider is `none`",
            );
        }
        _ => {}
    }
    if ner.timeout_secs == Some(0) {
        report.error("ner.timeoutSecs", "Must be greater than zero");
    }
}

fn validate_matching(config: &PillScanConfig, report: &mut ValidationReport) {
    let threshold = config.min_confidence();
    if !(0.0..=100.0).contains(&threshold) {
        report.error(
            "matching.minConfidence",
            format!("Must be between 0 and 100, got {threshold}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MatchingConfig, NerConfig, OcrConfig};

    fn with_key() -> PillScanConfig {
        PillScanConfig {
            ocr: Some(OcrConfig {
                api_key: Some("k".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn google_vision_without_credentials_is_error() {
        let cfg = PillScanConfig {
            ocr: Some(OcrConfig::default()),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert!(report.errors.iter().any(|e| e.path == "ocr"));
    }

    #[test]
    fn api_key_is_enough() {
        assert!(validate(&with_key()).is_valid());
    }

    #[test]
    fn http_ner_requires_endpoint() {
        let mut cfg = with_key();
        cfg.ner = Some(NerConfig {
            provider: Some(NerProviderKind::Http),
            ..Default::default()
        });
        let report = validate(&cfg);
        assert!(report.errors.iter().any(|e| e.path == "ner.endpoint"));

        cfg.ner.as_mut().unwrap().endpoint = Some("localhost:9000".into());
        assert!(!validate(&cfg).is_valid());

        cfg.ner.as_mut().unwrap().endpoint = Some("http://localhost:9000/ner".into());
        assert!(validate(&cfg).is_valid());
    }

    #[test]
    fn threshold_out_of_range() {
        let mut cfg = with_key();
        cfg.matching = Some(MatchingConfig {
            min_confidence: Some(120.0),
        });
        let report = validate(&cfg);
        assert!(report.errors.iter().any(|e| e.path == "matching.minConfidence"));
    }

    #[test]
    fn missing_catalog_is_only_a_warning() {
        let mut cfg = with_key();
        cfg.catalog = Some(crate::schema::CatalogConfig {
            path: Some("/definitely/not/here.csv".into()),
        });
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.path == "catalog.path"));
    }
}
