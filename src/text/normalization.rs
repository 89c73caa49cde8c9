// WHY: single cleaning pass applied to every scraped blob before any language analysis
// Each step is total over strings; nothing in here can fail

use unicode_normalization::UnicodeNormalization;

use super::mojibake::repair_mojibake;

/// Passes of the full step sequence before giving up on a stable result
/// WHY: a later step (zero-width removal, ligature expansion) can expose a token the repair step accepts
const MAX_NORMALIZATION_PASSES: usize = 4;

/// Normalize raw scraped text into canonical, whitespace-collapsed form
///
/// Steps, in order: mojibake repair, NFC composition, zero-width/format character removal,
/// Latin ligature expansion, Devanagari digit folding, whitespace collapse and trim.
/// Empty or whitespace-only input is returned unchanged; callers check emptiness themselves.
pub fn normalize_text(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let mut current = normalize_pass(text);
    for _ in 1..MAX_NORMALIZATION_PASSES {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// One run of the ordered step sequence
fn normalize_pass(text: &str) -> String {
    let repaired = repair_mojibake(text);
    let composed: String = repaired.nfc().collect();

    let mut cleaned = String::with_capacity(composed.len());
    for ch in composed.chars() {
        if is_zero_width(ch) {
            continue;
        }
        if let Some(expanded) = expand_ligature(ch) {
            cleaned.push_str(expanded);
            continue;
        }
        cleaned.push(fold_native_digit(ch));
    }

    let mut result = String::with_capacity(cleaned.len());
    collapse_whitespace_into(&cleaned, &mut result);
    result
}

/// Zero-width and directional format characters: U+200B..=U+200F and the BOM
pub fn is_zero_width(ch: char) -> bool {
    matches!(ch, '\u{200B}'..='\u{200F}' | '\u{FEFF}')
}

/// Latin presentation-form ligatures found in PDF text extraction
fn expand_ligature(ch: char) -> Option<&'static str> {
    match ch {
        '\u{FB00}' => Some("ff"),
        '\u{FB01}' => Some("fi"),
        '\u{FB02}' => Some("fl"),
        '\u{FB03}' => Some("ffi"),
        '\u{FB04}' => Some("ffl"),
        '\u{FB05}' => Some("ft"),
        '\u{FB06}' => Some("st"),
        _ => None,
    }
}

/// Map Devanagari digits ० through ९ to ASCII 0 through 9
fn fold_native_digit(ch: char) -> char {
    match ch {
        '\u{0966}'..='\u{096F}' => {
            let offset = ch as u32 - 0x0966;
            char::from_digit(offset, 10).unwrap_or(ch)
        }
        _ => ch,
    }
}

/// Collapse every whitespace run into a single space and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    collapse_whitespace_into(text, &mut result);
    result
}

/// Collapse whitespace into supplied buffer to avoid allocation
/// WHY: the deduplicator fingerprints every blob and reuses one buffer per document
pub fn collapse_whitespace_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    for word in text.split_whitespace() {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(word);
    }
}
