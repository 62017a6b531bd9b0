//! Config defaults: applies default values to parsed config.

use crate::schema::{
    CatalogConfig, LoggingConfig, MatchingConfig, NerConfig, OcrConfig, PillScanConfig,
    ServerConfig,
};

pub const DEFAULT_BIND: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 5000;

/// 10 MiB; phone photos of labels are usually well below this.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_CATALOG_PATH: &str = "sorted_cleaned_dataset.csv";

pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_NER_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_MIN_CONFIDENCE: f64 = 70.0;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: PillScanConfig) -> PillScanConfig {
    let config = apply_server_defaults(config);
    let config = apply_catalog_defaults(config);
    let config = apply_collaborator_defaults(config);
    let config = apply_matching_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: PillScanConfig) -> PillScanConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    server.bind.get_or_insert_with(|| DEFAULT_BIND.to_string());
    server.port.get_or_insert(DEFAULT_PORT);
    server.cors.get_or_insert(true);
    server.max_upload_bytes.get_or_insert(DEFAULT_MAX_UPLOAD_BYTES);
    config
}

fn apply_catalog_defaults(mut config: PillScanConfig) -> PillScanConfig {
    let catalog = config.catalog.get_or_insert_with(CatalogConfig::default);
    catalog.path.get_or_insert_with(|| DEFAULT_CATALOG_PATH.into());
    config
}

/// OCR defaults to Google Vision, NER to the built-in rules.
fn apply_collaborator_defaults(mut config: PillScanConfig) -> PillScanConfig {
    let ocr = config.ocr.get_or_insert_with(OcrConfig::default);
    ocr.provider.get_or_insert_with(Default::default);
    ocr.timeout_secs.get_or_insert(DEFAULT_OCR_TIMEOUT_SECS);

    let ner = config.ner.get_or_insert_with(NerConfig::default);
    ner.provider.get_or_insert_with(Default::default);
    ner.timeout_secs.get_or_insert(DEFAULT_NER_TIMEOUT_SECS);
    config
}

fn apply_matching_defaults(mut config: PillScanConfig) -> PillScanConfig {
    let matching = config.matching.get_or_insert_with(MatchingConfig::default);
    matching.min_confidence.get_or_insert(DEFAULT_MIN_CONFIDENCE);
    config
}

fn apply_logging_defaults(mut config: PillScanConfig) -> PillScanConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NerProviderKind, OcrProviderKind};

    #[test]
    fn fills_empty_config() {
        let cfg = apply_all_defaults(PillScanConfig::default());
        assert_eq!(cfg.server.as_ref().unwrap().port, Some(DEFAULT_PORT));
        assert_eq!(
            cfg.ocr.as_ref().unwrap().provider,
            Some(OcrProviderKind::GoogleVision)
        );
        assert_eq!(cfg.ner.as_ref().unwrap().provider, Some(NerProviderKind::Rules));
        assert_eq!(
            cfg.matching.unwrap().min_confidence,
            Some(DEFAULT_MIN_CONFIDENCE)
        );
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = PillScanConfig::default();
        cfg.server = Some(ServerConfig {
            port: Some(9000),
            cors: Some(false),
            ..Default::default()
        });
        cfg.ner = Some(NerConfig {
            provider: Some(NerProviderKind::None),
            ..Default::default()
        });
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.port(), 9000);
        assert!(!cfg.cors_enabled());
        assert_eq!(cfg.ner.unwrap().provider, Some(NerProviderKind::None));
    }
}
