// WHY: LibreTranslate wraps the same Argos ne→en models an offline install would use
// Blocking client: the pipeline calls translators from synchronous code on the blocking pool

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::Translator;
use crate::config::TranslationConfig;
use crate::error::TranslationError;

/// HTTP translator speaking the LibreTranslate `/translate` API
pub struct LibreTranslateTranslator {
    client: Client,
    translate_url: String,
    api_key: Option<String>,
    source_lang: String,
    target_lang: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreTranslateResponse {
    translated_text: String,
}

impl LibreTranslateTranslator {
    /// Build the HTTP client; the configured timeout covers the whole request
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslationError> {
        let endpoint = config.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(TranslationError::Unavailable(
                "LibreTranslate endpoint not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            translate_url: format!("{endpoint}/translate"),
            api_key: config.api_key.clone(),
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
        })
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "q": text,
            "source": self.source_lang,
            "target": self.target_lang,
            "format": "text",
        });
        if let Some(ref api_key) = self.api_key {
            body["api_key"] = serde_json::Value::String(api_key.clone());
        }
        body
    }
}

impl Translator for LibreTranslateTranslator {
    fn name(&self) -> &'static str {
        "libretranslate"
    }

    fn try_translate(&self, text: &str) -> Result<String, TranslationError> {
        debug!(chars = text.chars().count(), "Sending text to LibreTranslate");

        let response = self
            .client
            .post(&self.translate_url)
            .json(&self.request_body(text))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TranslationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: LibreTranslateResponse = response.json()?;
        Ok(parsed.translated_text)
    }
}
