//! Translation port and its providers.
//!
//! Every provider is fail-closed: `Translator::translate` never errors and returns the input
//! unchanged when the provider cannot deliver. Whether translation is enabled at all travels
//! beside the port as an explicit flag in [`TranslatorHandle`].

mod inline;
mod libretranslate;
mod noop;

pub use inline::{InlineReport, InlineSpanReplacer};
pub use libretranslate::LibreTranslateTranslator;
pub use noop::NoopTranslator;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{TranslationConfig, TranslationProvider};
use crate::error::TranslationError;

/// Nepali → English translation capability
pub trait Translator: Send + Sync {
    /// Short provider name for logs and stats
    fn name(&self) -> &'static str;

    /// Provider call; may fail
    fn try_translate(&self, text: &str) -> Result<String, TranslationError>;

    /// Total translation: any provider failure or panic yields `text` unchanged
    fn translate(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        match panic::catch_unwind(AssertUnwindSafe(|| self.try_translate(text))) {
            Ok(Ok(translated)) => translated,
            Ok(Err(error)) => {
                warn!(
                    provider = self.name(),
                    chars = text.chars().count(),
                    %error,
                    "Translation failed, keeping source text"
                );
                text.to_string()
            }
            Err(_) => {
                warn!(
                    provider = self.name(),
                    chars = text.chars().count(),
                    "Translation provider panicked, keeping source text"
                );
                text.to_string()
            }
        }
    }
}

/// A translator plus the explicit decision whether it actually translates
#[derive(Clone)]
pub struct TranslatorHandle {
    pub translator: Arc<dyn Translator>,
    pub enabled: bool,
}

impl TranslatorHandle {
    /// Pass-through handle with translation disabled
    pub fn disabled() -> Self {
        Self {
            translator: Arc::new(NoopTranslator::new()),
            enabled: false,
        }
    }
}

/// Build the configured translator
///
/// A provider that cannot be constructed degrades to a disabled pass-through handle so the run
/// still produces normalized output. Must be called outside an async context.
pub fn create_translator(config: &TranslationConfig) -> TranslatorHandle {
    match config.provider {
        TranslationProvider::Disabled => {
            info!("Translation disabled");
            TranslatorHandle::disabled()
        }
        TranslationProvider::LibreTranslate => match LibreTranslateTranslator::new(config) {
            Ok(translator) => {
                info!(
                    endpoint = %config.endpoint,
                    timeout_secs = config.timeout_secs,
                    "Using LibreTranslate translator"
                );
                TranslatorHandle {
                    translator: Arc::new(translator),
                    enabled: true,
                }
            }
            Err(error) => {
                warn!(%error, "Failed to initialize LibreTranslate, translation disabled");
                TranslatorHandle::disabled()
            }
        },
    }
}
