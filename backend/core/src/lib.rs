//! Core of the PillScan label reader: catalog, fuzzy matching policy,
//! collaborator traits and the scan pipeline.

pub mod catalog;
pub mod error;
pub mod fuzzy;
pub mod matching;
pub mod pipeline;
pub mod traits;
pub mod types;

pub use catalog::Catalog;
pub use error::{ScanError, ScanStage};
pub use matching::{best_candidate, search_key, MatchPolicy, DEFAULT_MIN_CONFIDENCE};
pub use pipeline::ScanPipeline;
pub use traits::{EntityRecognizer, TextExtractor};
pub use types::{
    normalize_name, CatalogRecord, Entity, EntityHint, EntityLabel, ExtractionResult,
    MatchResult, ScanReport,
};
