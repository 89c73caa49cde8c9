//! Coarse whole-document language tag.
//!
//! The tag is informational and independent from the script ratio: a document can be tagged
//! `en` and still carry Devanagari spans. Both are kept on the blob.

use tracing::debug;
use whatlang::Lang;

/// Tag stored when detection is skipped or fails
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Detect the dominant language of `text`, falling back to [`UNKNOWN_LANGUAGE`]
///
/// Texts of `min_chars` characters or fewer are not analysed.
pub fn detect_language(text: &str, min_chars: usize) -> String {
    if text.chars().count() <= min_chars {
        return UNKNOWN_LANGUAGE.to_string();
    }

    match whatlang::detect(text) {
        Some(info) => {
            debug!(
                lang = info.lang().code(),
                confidence = info.confidence(),
                reliable = info.is_reliable(),
                "Detected document language"
            );
            language_code(info.lang()).to_string()
        }
        None => UNKNOWN_LANGUAGE.to_string(),
    }
}

/// Whether a language tag denotes English output already
pub fn is_english(tag: &str) -> bool {
    tag.starts_with("en")
}

/// ISO 639-1 for the languages this corpus actually contains, ISO 639-3 otherwise
fn language_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Nep => "ne",
        Lang::Hin => "hi",
        Lang::Mar => "mr",
        Lang::Ben => "bn",
        other => other.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_unknown() {
        assert_eq!(detect_language("Hello there", 20), UNKNOWN_LANGUAGE);
        assert_eq!(detect_language("", 20), UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_detects_english() {
        let text = "The university publishes admission notices and examination results on this page every semester.";
        assert_eq!(detect_language(text, 20), "en");
    }

    #[test]
    fn test_is_english() {
        assert!(is_english("en"));
        assert!(is_english("en-US"));
        assert!(!is_english("ne"));
        assert!(!is_english(UNKNOWN_LANGUAGE));
    }
}
