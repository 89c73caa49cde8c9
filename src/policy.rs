// WHY: full-document translation is reserved for blobs dominated by Devanagari
// Sparse fragments in English prose go through the inline replacer to keep surrounding context

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::config::PrepConfig;
use crate::text::is_english;
use crate::translation::{InlineReport, InlineSpanReplacer, Translator};

/// Which translation path a blob takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationDecision {
    /// Translate the whole (truncated) text
    FullDocument,
    /// Replace Devanagari spans in place
    Inline,
    /// Already English; the normalized text is the translation
    Identity,
    /// Leave the translated field unset
    Untranslated,
}

/// Thresholds and switches the policy decides with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyConfig {
    pub majority_threshold: f64,
    /// Explicit switch; never inferred from the translator's type
    pub translation_enabled: bool,
    pub inline_mode_enabled: bool,
    pub char_limit_for_full_translation: usize,
    pub max_chars_per_inline_budget: usize,
}

impl PolicyConfig {
    pub fn from_prep_config(config: &PrepConfig, translation_enabled: bool) -> Self {
        Self {
            majority_threshold: config.nepali_majority_threshold,
            translation_enabled,
            inline_mode_enabled: config.inline_mode_enabled,
            char_limit_for_full_translation: config.char_limit_for_full_translation,
            max_chars_per_inline_budget: config.max_chars_per_inline_budget,
        }
    }
}

/// Four-way branch on script ratio, language tag and configuration
pub fn classify(ratio: f64, lang: &str, config: &PolicyConfig) -> TranslationDecision {
    if config.translation_enabled {
        if ratio >= config.majority_threshold {
            return TranslationDecision::FullDocument;
        }
        if ratio > 0.0 && config.inline_mode_enabled {
            return TranslationDecision::Inline;
        }
    }
    if ratio == 0.0 && is_english(lang) {
        return TranslationDecision::Identity;
    }
    TranslationDecision::Untranslated
}

/// Leading `limit` characters of `text`
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Result of running the policy on one blob
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutcome {
    pub decision: TranslationDecision,
    pub translated: Option<String>,
    /// Present only for inline decisions
    pub inline_report: Option<InlineReport>,
}

/// Decision layer that also carries out the chosen translation
pub struct DocumentClassifierPolicy {
    config: PolicyConfig,
    translator: Arc<dyn Translator>,
    replacer: Arc<InlineSpanReplacer>,
}

impl DocumentClassifierPolicy {
    pub fn new(
        config: PolicyConfig,
        translator: Arc<dyn Translator>,
        replacer: Arc<InlineSpanReplacer>,
    ) -> Self {
        Self {
            config,
            translator,
            replacer,
        }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn classify(&self, ratio: f64, lang: &str) -> TranslationDecision {
        classify(ratio, lang, &self.config)
    }

    /// Decide for `text` and produce its translated field
    pub fn resolve(&self, text: &str, ratio: f64, lang: &str) -> PolicyOutcome {
        let decision = self.classify(ratio, lang);
        debug!(?decision, ratio, lang, "Classified blob");

        let (translated, inline_report) = match decision {
            TranslationDecision::FullDocument => {
                let head = truncate_chars(text, self.config.char_limit_for_full_translation);
                (Some(self.translator.translate(head)), None)
            }
            TranslationDecision::Inline => {
                let (replaced, report) = self
                    .replacer
                    .replace_with_report(text, self.config.max_chars_per_inline_budget);
                (Some(replaced), Some(report))
            }
            TranslationDecision::Identity => (Some(text.to_string()), None),
            TranslationDecision::Untranslated => (None, None),
        };

        PolicyOutcome {
            decision,
            translated,
            inline_report,
        }
    }
}
