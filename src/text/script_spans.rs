// WHY: span detection is the only place that knows what "foreign script" means
// The replacer and the classifier policy consume byte ranges and never look at the pattern

use anyhow::Result;
use regex_automata::meta::Regex;
use std::ops::Range;
use tracing::debug;

/// First code point of the Devanagari block
pub const DEVANAGARI_START: char = '\u{0900}';
/// Last code point of the Devanagari block
pub const DEVANAGARI_END: char = '\u{097F}';

/// Glue allowed between two script runs of one span: ZWNJ, ZWJ, hyphen, en dash, em dash, whitespace
const SPAN_GLUE_CLASS: &str = r"[\x{200C}\x{200D}\-\x{2013}\x{2014}\s]";

/// Source of target-script spans inside a string
///
/// Implementations yield maximal, non-overlapping byte ranges from left to right. Calling
/// `spans` again on the same text restarts the sequence.
pub trait SpanDetector: Send + Sync {
    fn spans<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = Range<usize>> + 'a>;
}

/// Regex-backed detector for one contiguous Unicode block
pub struct ScriptBlockDetector {
    block: (char, char),
    regex: Regex,
}

impl ScriptBlockDetector {
    /// Compile a detector for the inclusive code point range `start..=end`
    pub fn new(start: char, end: char) -> Result<Self> {
        if start > end {
            anyhow::bail!(
                "Invalid script block: U+{:04X} is after U+{:04X}",
                u32::from(start),
                u32::from(end)
            );
        }

        let block_class = format!(r"[\x{{{:04X}}}-\x{{{:04X}}}]", u32::from(start), u32::from(end));
        let pattern = format!("{block_class}+(?:{SPAN_GLUE_CLASS}*{block_class}+)*");
        let regex = Regex::new(&pattern)?;

        debug!("Compiled script span pattern: {}", pattern);

        Ok(Self {
            block: (start, end),
            regex,
        })
    }

    /// Detector for Devanagari, the script Nepali is written in
    pub fn devanagari() -> Result<Self> {
        Self::new(DEVANAGARI_START, DEVANAGARI_END)
    }

    /// Whether a single character falls inside the detector's block
    pub fn contains_char(&self, ch: char) -> bool {
        (self.block.0..=self.block.1).contains(&ch)
    }
}

impl SpanDetector for ScriptBlockDetector {
    fn spans<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = Range<usize>> + 'a> {
        Box::new(self.regex.find_iter(text).map(|m| m.range()))
    }
}

/// Fraction of `text` characters that sit inside detected spans, in `[0.0, 1.0]`
///
/// Lengths are counted in Unicode scalar values. Empty input yields `0.0`.
pub fn script_ratio(detector: &dyn SpanDetector, text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let span_chars: usize = detector
        .spans(text)
        .map(|range| text[range].chars().count())
        .sum();
    let total_chars = text.chars().count().max(1);

    span_chars as f64 / total_chars as f64
}
