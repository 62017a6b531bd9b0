//! Label understanding collaborators: OCR and medication entity recognition.

pub mod entity;
pub mod mock;
pub mod ner_http;
pub mod ocr;

pub use entity::{NoopRecognizer, RuleBasedRecognizer};
pub use mock::{MockRecognizer, MockTextExtractor};
pub use ner_http::HttpEntityRecognizer;
pub use ocr::{GoogleVisionOcr, VisionAuth, DEFAULT_VISION_ENDPOINT};
