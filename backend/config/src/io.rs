//! Config file location and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the PillScan config directory.
/// Priority: `PILLSCAN_CONFIG_DIR` env > `~/.pillscan/` > `./.pillscan/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PILLSCAN_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".pillscan"),
        None => PathBuf::from(".pillscan"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the YAML config as an untyped value tree.
///
/// Returns an empty mapping if the file doesn't exist, so a fresh install runs
/// on defaults.
pub async fn load_config_value(path: &Path) -> Result<Value> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value = parse_yaml(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

/// Parse YAML text; an empty document is an empty mapping.
pub fn parse_yaml(raw: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(raw)?;
    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_empty_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let value = load_config_value(&dir.path().join("nope.yaml")).await.unwrap();
        assert_eq!(value, Value::Object(Default::default()));
    }

    #[tokio::test]
    async fn reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "server:\n  port: 6000\n").unwrap();
        let value = load_config_value(&path).await.unwrap();
        assert_eq!(value["server"]["port"], 6000);
    }

    #[test]
    fn empty_document_is_empty_mapping() {
        assert!(parse_yaml("").unwrap().as_object().unwrap().is_empty());
    }

    #[test]
    fn malformed_yaml_is_error() {
        assert!(parse_yaml("server: [unclosed").is_err());
    }
}
