// WHY: sparse Devanagari fragments inside English prose are translated in place
// Budget bounds new translation work per call; the cache persists across calls and documents

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::Translator;
use crate::text::SpanDetector;

/// Per-call accounting of an inline replacement
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InlineReport {
    /// Spans found in the text
    pub spans_seen: usize,
    /// Spans substituted from the cache
    pub cache_hits: usize,
    /// Spans sent to the translator
    pub translated: usize,
    /// Spans left verbatim because the budget would have been exceeded
    pub skipped_for_budget: usize,
    /// Original characters sent to the translator
    pub budget_used: usize,
}

/// Replaces target-script spans with their translations, memoizing every span it translates
///
/// The cache lock is never held across a translator call. Two workers missing on the same span
/// may both translate it; the later insert overwrites an equal value.
pub struct InlineSpanReplacer {
    translator: Arc<dyn Translator>,
    detector: Arc<dyn SpanDetector>,
    cache: Mutex<HashMap<String, String>>,
}

impl InlineSpanReplacer {
    /// Create a replacer with an empty cache
    pub fn new(translator: Arc<dyn Translator>, detector: Arc<dyn SpanDetector>) -> Self {
        Self {
            translator,
            detector,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Replace spans in `text`, translating at most `char_budget` original characters
    pub fn replace(&self, text: &str, char_budget: usize) -> String {
        self.replace_with_report(text, char_budget).0
    }

    /// Same as [`Self::replace`], also returning what happened to each span
    ///
    /// Cache hits are substituted regardless of the budget. A cache miss whose length would push
    /// the used budget past `char_budget` stays verbatim and is not cached.
    pub fn replace_with_report(&self, text: &str, char_budget: usize) -> (String, InlineReport) {
        let mut output = String::with_capacity(text.len());
        let mut report = InlineReport::default();
        let mut last_end = 0;

        for span in self.detector.spans(text) {
            output.push_str(&text[last_end..span.start]);
            let chunk = &text[span.start..span.end];
            report.spans_seen += 1;

            if let Some(cached) = self.cached(chunk) {
                output.push_str(&cached);
                report.cache_hits += 1;
            } else {
                let chunk_chars = chunk.chars().count();
                if report.budget_used + chunk_chars > char_budget {
                    output.push_str(chunk);
                    report.skipped_for_budget += 1;
                } else {
                    let translated = self.translator.translate(chunk);
                    output.push_str(&translated);
                    self.lock_cache().insert(chunk.to_string(), translated);
                    report.budget_used += chunk_chars;
                    report.translated += 1;
                }
            }

            last_end = span.end;
        }
        output.push_str(&text[last_end..]);

        debug!(?report, "Inline replacement finished");
        (output, report)
    }

    /// Number of distinct spans memoized so far
    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    fn cached(&self, chunk: &str) -> Option<String> {
        self.lock_cache().get(chunk).cloned()
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // Inserts are single calls, so a poisoned map holds only complete entries
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
