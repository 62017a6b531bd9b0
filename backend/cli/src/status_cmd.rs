//! CLI Status Command
//!
//! Probes a running server's health endpoint.

use anyhow::Result;
use serde_json::Value;

pub fn health_url(port: u16) -> String {
    format!("http://localhost:{port}/api/health")
}

/// Pretty health report, or a not-running notice when the probe failed.
pub fn render_status(report: Option<&Value>, port: u16) -> Result<String> {
    match report {
        Some(body) => Ok(serde_json::to_string_pretty(body)?),
        None => Ok(format!("PillScan is not running on port {port}")),
    }
}

pub async fn run(port: u16) -> Result<()> {
    let client = reqwest::Client::new();
    let report = match client.get(health_url(port)).send().await {
        Ok(resp) => Some(resp.json::<Value>().await?),
        Err(_) => None,
    };
    println!("{}", render_status(report.as_ref(), port)?);
    Ok(())
}
