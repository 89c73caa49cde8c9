// WHY: one validated config value drives every run; bad values abort before any folder is read
// Precedence: built-in defaults < TOML file < CLI flags

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ConfigError;

/// Which translator backs the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// Pass-through; translation disabled
    #[serde(rename = "none")]
    #[value(name = "none")]
    Disabled,
    /// LibreTranslate-compatible HTTP service (Argos models)
    #[default]
    #[value(name = "libretranslate")]
    LibreTranslate,
}

/// Translator connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub provider: TranslationProvider,
    /// Base URL of the LibreTranslate service
    pub endpoint: String,
    /// Optional API key forwarded with every request
    pub api_key: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    /// Per-request timeout; a timeout counts as a failed translation
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::LibreTranslate,
            endpoint: "http://localhost:5000".to_string(),
            api_key: None,
            source_lang: "ne".to_string(),
            target_lang: "en".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Per-run preprocessing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Characters of a blob sent for full-document translation
    pub char_limit_for_full_translation: usize,
    /// Original-script characters one inline replacement call may translate
    pub max_chars_per_inline_budget: usize,
    /// Blobs shorter than this (in characters) are dropped
    pub min_paragraph_length: usize,
    pub inline_mode_enabled: bool,
    /// Script ratio at or above which a blob is translated whole
    pub nepali_majority_threshold: f64,
    /// Texts this short or shorter are tagged "unknown" without running detection
    pub language_detection_min_chars: usize,
    /// Page cap per PDF; 0 disables the cap
    pub max_pdf_pages: usize,
    pub translation: TranslationConfig,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            char_limit_for_full_translation: 15_000,
            max_chars_per_inline_budget: 15_000,
            min_paragraph_length: 30,
            inline_mode_enabled: true,
            nepali_majority_threshold: 0.30,
            language_detection_min_chars: 20,
            max_pdf_pages: 50,
            translation: TranslationConfig::default(),
        }
    }
}

/// Values supplied on the command line; `None` keeps the file/default value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub translate_provider: Option<TranslationProvider>,
    pub translate_endpoint: Option<String>,
    pub translate_timeout_secs: Option<u64>,
    /// Sets both limits unless `inline_char_budget` is also given
    pub translate_char_limit: Option<usize>,
    pub inline_char_budget: Option<usize>,
    pub max_pdf_pages: Option<usize>,
    pub min_paragraph_len: Option<usize>,
    pub no_inline_mixed: bool,
    pub nepali_majority_threshold: Option<f64>,
}

impl PrepConfig {
    /// Load from a TOML file; missing keys take their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config file: {}", path.display());
        Ok(config)
    }

    /// Apply CLI values on top of this config
    pub fn apply_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(provider) = overrides.translate_provider {
            self.translation.provider = provider;
        }
        if let Some(ref endpoint) = overrides.translate_endpoint {
            self.translation.endpoint = endpoint.clone();
        }
        if let Some(timeout) = overrides.translate_timeout_secs {
            self.translation.timeout_secs = timeout;
        }
        if let Some(limit) = overrides.translate_char_limit {
            self.char_limit_for_full_translation = limit;
            self.max_chars_per_inline_budget = limit;
        }
        if let Some(budget) = overrides.inline_char_budget {
            self.max_chars_per_inline_budget = budget;
        }
        if let Some(pages) = overrides.max_pdf_pages {
            self.max_pdf_pages = pages;
        }
        if let Some(min_len) = overrides.min_paragraph_len {
            self.min_paragraph_length = min_len;
        }
        if overrides.no_inline_mixed {
            self.inline_mode_enabled = false;
        }
        if let Some(threshold) = overrides.nepali_majority_threshold {
            self.nepali_majority_threshold = threshold;
        }
        self
    }

    /// Reject values that would make the policy meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.nepali_majority_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            // NaN fails the range check as well
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }
        if self.char_limit_for_full_translation == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "char_limit_for_full_translation",
            });
        }
        if self.translation.provider == TranslationProvider::LibreTranslate {
            if self.translation.endpoint.trim().is_empty() {
                return Err(ConfigError::EmptyEndpoint);
            }
            if self.translation.timeout_secs == 0 {
                return Err(ConfigError::ZeroLimit {
                    field: "translation.timeout_secs",
                });
            }
        }
        Ok(())
    }
}

/// Concurrent folder workers for a `--jobs` value, capped at the CPU count
pub fn resolve_jobs(requested: usize) -> Result<usize, ConfigError> {
    if requested == 0 {
        return Err(ConfigError::ZeroLimit { field: "jobs" });
    }
    Ok(requested.min(num_cpus::get().max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PrepConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.nepali_majority_threshold, 0.30);
        assert_eq!(config.min_paragraph_length, 30);
        assert!(config.inline_mode_enabled);
    }

    #[test]
    fn test_threshold_out_of_range() {
        for bad in [-0.1, 1.5, f64::NAN] {
            let config = PrepConfig {
                nepali_majority_threshold: bad,
                ..PrepConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::ThresholdOutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_zero_char_limit_rejected() {
        let config = PrepConfig {
            char_limit_for_full_translation: 0,
            ..PrepConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLimit { .. })));
    }

    #[test]
    fn test_empty_endpoint_only_matters_when_enabled() {
        let mut config = PrepConfig::default();
        config.translation.endpoint = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyEndpoint)));

        config.translation.provider = TranslationProvider::Disabled;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_char_limit_override_sets_both_limits() {
        let overrides = ConfigOverrides {
            translate_char_limit: Some(500),
            ..ConfigOverrides::default()
        };
        let config = PrepConfig::default().apply_overrides(&overrides);
        assert_eq!(config.char_limit_for_full_translation, 500);
        assert_eq!(config.max_chars_per_inline_budget, 500);

        let overrides = ConfigOverrides {
            translate_char_limit: Some(500),
            inline_char_budget: Some(80),
            no_inline_mixed: true,
            ..ConfigOverrides::default()
        };
        let config = PrepConfig::default().apply_overrides(&overrides);
        assert_eq!(config.char_limit_for_full_translation, 500);
        assert_eq!(config.max_chars_per_inline_budget, 80);
        assert!(!config.inline_mode_enabled);
    }

    #[test]
    fn test_toml_partial_file_keeps_defaults() {
        let parsed: PrepConfig = toml::from_str(
            r#"
            min_paragraph_length = 10

            [translation]
            provider = "none"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.min_paragraph_length, 10);
        assert_eq!(parsed.translation.provider, TranslationProvider::Disabled);
        assert_eq!(parsed.char_limit_for_full_translation, 15_000);
        assert_eq!(parsed.translation.target_lang, "en");
    }

    #[test]
    fn test_jobs_must_be_positive() {
        assert!(matches!(resolve_jobs(0), Err(ConfigError::ZeroLimit { field: "jobs" })));
        assert_eq!(resolve_jobs(1).unwrap(), 1);
        assert!(resolve_jobs(10_000).unwrap() <= num_cpus::get().max(1));
    }
}
