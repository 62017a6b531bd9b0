//! CLI Match Command
//!
//! Runs the matching policy on a piece of label text and renders the outcome
//! as JSON.

use anyhow::Result;
use serde_json::{json, Value};

use pillscan_core::{Catalog, EntityHint, MatchPolicy, ScanError};

/// JSON body describing how `text` (or `hint`) resolved against the catalog.
pub fn match_body(text: &str, hint: Option<String>, catalog: &Catalog, policy: MatchPolicy) -> Value {
    let hint = hint.map(|drug_name| EntityHint { drug_name });

    match policy.resolve(text, hint.as_ref(), catalog) {
        Ok(found) => {
            let record = catalog.find_by_name(&found.matched_name);
            json!({
                "medicine_name": found.matched_name,
                "score": found.score,
                "full_description": record.map(|r| r.full_description.as_str()),
                "side_effects": record.map(|r| r.side_effects.as_str()),
            })
        }
        Err(ScanError::LowConfidenceMatch { best, .. }) => json!({
            "error": "No confident match found",
            "best_candidate": best.matched_name,
            "score": best.score,
        }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

pub fn run(text: &str, hint: Option<String>, catalog: &Catalog, policy: MatchPolicy) -> Result<()> {
    let body = match_body(text, hint, catalog, policy);
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillscan_core::CatalogRecord;

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            CatalogRecord::new("ibuprofen", "Anti-inflammatory", "Heartburn"),
            CatalogRecord::new("paracetamol", "Pain reliever", "Nausea"),
        ])
    }

    #[test]
    fn confident_match_includes_record() {
        let body = match_body("Paracetmol 500mg", None, &catalog(), MatchPolicy::default());
        assert_eq!(body["medicine_name"], "paracetamol");
        assert_eq!(body["full_description"], "Pain reliever");
        assert_eq!(body["side_effects"], "Nausea");
        assert!(body["score"].as_f64().unwrap() >= 70.0);
        assert!(body.get("error").is_none());
    }

    #[test]
    fn hint_takes_precedence() {
        let body = match_body(
            "Paracetamol",
            Some("ibuprofen".into()),
            &catalog(),
            MatchPolicy::default(),
        );
        assert_eq!(body["medicine_name"], "ibuprofen");
        assert_eq!(body["score"], 100.0);
    }

    #[test]
    fn low_confidence_reports_best_candidate() {
        let body = match_body(
            "PARACETAMOL",
            Some("PARACETAMOL".into()),
            &catalog(),
            MatchPolicy::default(),
        );
        assert_eq!(body["error"], "No confident match found");
        assert_eq!(body["best_candidate"], "ibuprofen");
        assert_eq!(body["score"], 0.0);
    }

    #[test]
    fn empty_catalog_has_no_match() {
        let body = match_body(
            "paracetamol",
            None,
            &Catalog::default(),
            MatchPolicy::default(),
        );
        assert_eq!(body["error"], "No match found");
        assert!(body.get("best_candidate").is_none());
    }
}
