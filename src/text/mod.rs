// WHY: leaf text analysis shared by the pipeline, the inline replacer and the deduplicator
// Nothing in here performs I/O or calls a translator

pub mod language;
pub mod mojibake;
pub mod normalization;
pub mod script_spans;

// Re-export core types
pub use language::{detect_language, is_english, UNKNOWN_LANGUAGE};
pub use mojibake::repair_mojibake;
pub use normalization::{collapse_whitespace, collapse_whitespace_into, normalize_text};
pub use script_spans::{script_ratio, ScriptBlockDetector, SpanDetector};
