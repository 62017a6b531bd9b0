//! `pillscan-config`: PillScan runtime configuration.
//!
//! Provides:
//! - Typed config schema (server, catalog, OCR, NER, matching, logging)
//! - YAML loading from the config directory
//! - `${ENV_VAR}` substitution for credentials
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config_value, parse_yaml};
pub use schema::{
    CatalogConfig, LoggingConfig, MatchingConfig, NerConfig, NerProviderKind, OcrConfig,
    OcrProviderKind, PillScanConfig, ServerConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load a config file, substitute env vars, apply defaults, and validate.
///
/// The report is returned rather than logged so callers can install the
/// subscriber (which depends on this config) first.
pub async fn load_and_prepare(path: &Path) -> Result<(PillScanConfig, ValidationReport)> {
    let value = load_config_value(path).await?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config = prepare(value)?;
    let report = validate(&config);
    Ok((config, report))
}

/// Emit every warning and error of a report through `tracing`.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}

/// Deserialize an env-resolved value tree and apply defaults.
pub fn prepare(value: Value) -> Result<PillScanConfig> {
    let config: PillScanConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;
    Ok(apply_all_defaults(config))
}
