//! Matching policy: pick a search key, fuzzy-match it against the catalog,
//! and accept the best candidate only above a fixed confidence threshold.

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::ScanError;
use crate::fuzzy::partial_ratio;
use crate::types::{EntityHint, MatchResult};

/// Minimum partial-ratio score for a match to be accepted.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 70.0;

/// Search key for the catalog: the recognized drug name when there is one,
/// otherwise the lowercased, trimmed OCR text.
pub fn search_key(raw_text: &str, hint: Option<&EntityHint>) -> String {
    match hint {
        Some(h) if !h.drug_name.is_empty() => h.drug_name.clone(),
        _ => raw_text.trim().to_lowercase(),
    }
}

/// Highest-scoring catalog record for `key`.
///
/// The key is scored as given; a hint keeps its casing, so "PARACETAMOL"
/// does not match the lowercase catalog name. Ties go to the first record in
/// catalog order. Returns `None` only for an empty catalog.
pub fn best_candidate(key: &str, catalog: &Catalog) -> Option<MatchResult> {
    let mut best: Option<MatchResult> = None;
    for record in catalog.records() {
        let score = partial_ratio(key, &record.normalized_name);
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(MatchResult {
                matched_name: record.normalized_name.clone(),
                score,
            });
        }
    }
    best
}

/// Matching policy with a configurable acceptance threshold.
#[derive(Debug, Clone, Copy)]
pub struct MatchPolicy {
    min_confidence: f64,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl MatchPolicy {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Resolve OCR text (and an optional NER hint) to a catalog name.
    ///
    /// An empty search key is scored like any other string.
    pub fn resolve(
        &self,
        raw_text: &str,
        hint: Option<&EntityHint>,
        catalog: &Catalog,
    ) -> Result<MatchResult, ScanError> {
        let key = search_key(raw_text, hint);
        let Some(best) = best_candidate(&key, catalog) else {
            return Err(ScanError::NoMatchFound {
                extracted_text: raw_text.to_string(),
            });
        };

        debug!(key = %key, candidate = %best.matched_name, score = best.score, "Best catalog candidate");

        if best.score < self.min_confidence {
            return Err(ScanError::LowConfidenceMatch {
                extracted_text: raw_text.to_string(),
                best,
            });
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CatalogRecord;

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::from_records(
            names
                .iter()
                .map(|n| CatalogRecord::new(n, format!("{n} description"), "none"))
                .collect(),
        )
    }

    fn hint(name: &str) -> EntityHint {
        EntityHint {
            drug_name: name.to_string(),
        }
    }

    #[test]
    fn key_falls_back_to_lowercased_trimmed_text() {
        assert_eq!(search_key("  Paracetmol 500MG \n", None), "paracetmol 500mg");
    }

    #[test]
    fn key_prefers_hint_verbatim() {
        let h = hint("Ibuprofen");
        assert_eq!(search_key("PARACETAMOL 500MG", Some(&h)), "Ibuprofen");
    }

    #[test]
    fn empty_hint_is_ignored() {
        let h = hint("");
        assert_eq!(search_key(" Aspirin ", Some(&h)), "aspirin");
    }

    #[test]
    fn accepts_misspelled_label() {
        let cat = catalog(&["ibuprofen", "paracetamol"]);
        let m = MatchPolicy::default()
            .resolve("Paracetmol 500mg", None, &cat)
            .unwrap();
        assert_eq!(m.matched_name, "paracetamol");
        assert!(m.score >= DEFAULT_MIN_CONFIDENCE);
    }

    #[test]
    fn hint_overrides_text() {
        let cat = catalog(&["ibuprofen", "paracetamol"]);
        let h = hint("ibuprofen");
        let m = MatchPolicy::default()
            .resolve("paracetamol", Some(&h), &cat)
            .unwrap();
        assert_eq!(m.matched_name, "ibuprofen");
        assert_eq!(m.score, 100.0);
    }

    #[test]
    fn empty_catalog_is_no_match() {
        let err = MatchPolicy::default()
            .resolve("paracetamol", None, &Catalog::default())
            .unwrap_err();
        assert!(matches!(err, ScanError::NoMatchFound { ref extracted_text } if extracted_text == "paracetamol"));
    }

    #[test]
    fn empty_text_is_low_confidence() {
        let cat = catalog(&["paracetamol"]);
        let err = MatchPolicy::default().resolve("", None, &cat).unwrap_err();
        match err {
            ScanError::LowConfidenceMatch { extracted_text, best } => {
                assert_eq!(extracted_text, "");
                assert_eq!(best.score, 0.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn low_score_keeps_extracted_text() {
        let cat = catalog(&["paracetamol"]);
        let err = MatchPolicy::default()
            .resolve("Zzzz Qqqq", None, &cat)
            .unwrap_err();
        assert!(matches!(err, ScanError::LowConfidenceMatch { ref extracted_text, .. } if extracted_text == "Zzzz Qqqq"));
    }

    #[test]
    fn uppercase_hint_is_scored_verbatim() {
        let cat = catalog(&["paracetamol"]);
        let h = hint("PARACETAMOL");
        let err = MatchPolicy::default()
            .resolve("PARACETAMOL 500MG", Some(&h), &cat)
            .unwrap_err();
        match err {
            ScanError::LowConfidenceMatch { extracted_text, best } => {
                assert_eq!(extracted_text, "PARACETAMOL 500MG");
                assert_eq!(best.score, 0.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ties_go_to_first_record() {
        let cat = catalog(&["aspirin forte", "aspirin"]);
        let best = best_candidate("aspirin", &cat).unwrap();
        assert_eq!(best.score, 100.0);
        assert_eq!(best.matched_name, "aspirin forte");
    }

    #[test]
    fn threshold_is_configurable() {
        let cat = catalog(&["paracetamol"]);
        let strict = MatchPolicy::new(95.0);
        assert!(strict.resolve("paracetmol", None, &cat).is_err());
        assert!(MatchPolicy::new(80.0)
            .resolve("paracetmol", None, &cat)
            .is_ok());
    }
}
