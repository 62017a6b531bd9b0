use thiserror::Error;

use crate::types::MatchResult;

/// Pipeline stage at which a scan was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStage {
    AwaitingInput,
    Extracting,
    Recognizing,
    Matching,
    Retrieving,
    Done,
    Failed,
}

impl std::fmt::Display for ScanStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScanStage::AwaitingInput => "awaiting_input",
            ScanStage::Extracting => "extracting",
            ScanStage::Recognizing => "recognizing",
            ScanStage::Matching => "matching",
            ScanStage::Retrieving => "retrieving",
            ScanStage::Done => "done",
            ScanStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Failure kinds of a single label scan.
///
/// Every variant except `MissingInput` carries whatever text the OCR stage
/// produced, so callers can show partial progress.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No image provided")]
    MissingInput,

    /// The OCR collaborator failed; the message is surfaced verbatim.
    #[error("{0}")]
    ExtractionFailed(String),

    #[error("No match found")]
    NoMatchFound { extracted_text: String },

    #[error("No confident match found")]
    LowConfidenceMatch {
        extracted_text: String,
        best: MatchResult,
    },

    #[error("{message}")]
    Internal {
        stage: ScanStage,
        message: String,
        extracted_text: Option<String>,
    },
}

impl ScanError {
    /// Text extracted before the failure, if extraction got that far.
    pub fn extracted_text(&self) -> Option<&str> {
        match self {
            ScanError::MissingInput | ScanError::ExtractionFailed(_) => None,
            ScanError::NoMatchFound { extracted_text }
            | ScanError::LowConfidenceMatch { extracted_text, .. } => Some(extracted_text),
            ScanError::Internal { extracted_text, .. } => extracted_text.as_deref(),
        }
    }

    /// Stage the pipeline was in when it failed.
    pub fn stage(&self) -> ScanStage {
        match self {
            ScanError::MissingInput => ScanStage::AwaitingInput,
            ScanError::ExtractionFailed(_) => ScanStage::Extracting,
            ScanError::NoMatchFound { .. } | ScanError::LowConfidenceMatch { .. } => {
                ScanStage::Matching
            }
            ScanError::Internal { stage, .. } => *stage,
        }
    }
}
