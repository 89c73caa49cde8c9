// WHY: scraped pages regularly arrive as UTF-8 bytes that were decoded as Windows-1252
// Devanagari suffers most: every character turns into three Latin-1 symbols

use std::borrow::Cow;

/// Undo UTF-8-read-as-Windows-1252 corruption token by token
///
/// A token (ASCII-whitespace delimited) is rewritten only when every character maps back to a
/// single Windows-1252 byte and the resulting bytes are valid UTF-8. Anything else, including
/// legitimate Latin-1 text such as "café", is left untouched. Whitespace is preserved verbatim.
pub fn repair_mojibake(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    let mut repaired = String::with_capacity(text.len());
    let mut token_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        // WHY: NBSP (0xA0) and NEL (0x85) are continuation bytes in garbled text, not separators
        if ch.is_ascii_whitespace() {
            if let Some(start) = token_start.take() {
                repaired.push_str(&repair_token(&text[start..idx]));
            }
            repaired.push(ch);
        } else if token_start.is_none() {
            token_start = Some(idx);
        }
    }
    if let Some(start) = token_start {
        repaired.push_str(&repair_token(&text[start..]));
    }

    repaired
}

/// Repeatedly decode a token until it stops changing (handles double-encoded text)
fn repair_token(token: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(token);
    // WHY: each successful decode strictly shortens the token, so this terminates
    while let Some(decoded) = decode_once(&current) {
        current = Cow::Owned(decoded);
    }
    current
}

fn decode_once(token: &str) -> Option<String> {
    if token.is_ascii() {
        return None;
    }
    let bytes = token.chars().map(windows_1252_byte).collect::<Option<Vec<u8>>>()?;
    let decoded = String::from_utf8(bytes).ok()?;
    (decoded != token).then_some(decoded)
}

/// Byte that Windows-1252 decodes to `ch`
/// C1 controls map to themselves, matching browsers that fall back to Latin-1 for undefined slots
fn windows_1252_byte(ch: char) -> Option<u8> {
    if let Ok(byte) = u8::try_from(u32::from(ch)) {
        return Some(byte);
    }
    let byte = match ch {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}
