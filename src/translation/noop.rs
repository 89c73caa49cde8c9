//! No-op translator (pass-through)

use super::Translator;
use crate::error::TranslationError;

/// Pass-through translator that returns its input
#[derive(Debug, Clone, Default)]
pub struct NoopTranslator;

impl NoopTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl Translator for NoopTranslator {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn try_translate(&self, text: &str) -> Result<String, TranslationError> {
        Ok(text.to_string())
    }
}
