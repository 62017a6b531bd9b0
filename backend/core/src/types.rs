use serde::{Deserialize, Serialize};

/// One row of the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Lowercased, trimmed medicine name.
    pub normalized_name: String,
    pub full_description: String,
    pub side_effects: String,
}

impl CatalogRecord {
    pub fn new(
        name: impl AsRef<str>,
        full_description: impl Into<String>,
        side_effects: impl Into<String>,
    ) -> Self {
        Self {
            normalized_name: normalize_name(name.as_ref()),
            full_description: full_description.into(),
            side_effects: side_effects.into(),
        }
    }
}

/// Lowercase and trim a medicine name the way catalog keys are stored.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Raw OCR output for one image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub raw_text: String,
}

/// Drug name proposed by the entity recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityHint {
    pub drug_name: String,
}

/// Best catalog candidate for a search key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub matched_name: String,
    /// Partial-ratio similarity in `[0, 100]`.
    pub score: f64,
}

/// Entity labels produced by medication NER models (Med7 label set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Drug,
    Strength,
    Dosage,
    Route,
    Form,
    Frequency,
    Duration,
    #[serde(other)]
    Other,
}

/// A labelled span recognized in OCR text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
    /// Byte offsets into the source text.
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
}

impl Entity {
    pub fn is_drug(&self) -> bool {
        self.label == EntityLabel::Drug
    }
}

/// Successful scan, ready to be rendered to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub extracted_text: String,
    pub medicine_name: String,
    pub full_description: String,
    pub side_effects: String,
    /// Similarity of the accepted match; not part of the HTTP body.
    #[serde(skip)]
    pub score: f64,
}
