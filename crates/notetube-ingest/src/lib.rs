//! NoteTube Ingest: file text extraction, text normalization, language
//! detection and keyword extraction.

pub mod file;
pub mod keywords;
pub mod language;
pub mod text;

pub use file::{DocumentExtractor, FileExtractor, FileType};
pub use keywords::{
    Algorithm, ExtractionParams, KeywordAdapter, KeywordExtractor, Rake, TextRank,
};
pub use language::{detect_language, DetectionResult};
pub use text::normalize;
