// WHY: scraped sites repeat the same notice across pages and PDFs
// Duplicates are judged on the final text so a translated copy matches its English original

use std::collections::HashSet;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

use crate::entity::TextBlob;
use crate::text::collapse_whitespace;

/// Content fingerprint of whitespace-collapsed text
pub fn fingerprint(text: &str) -> u64 {
    xxh64(collapse_whitespace(text).as_bytes(), 0)
}

/// Blobs that survived plus counts of what was dropped and why
#[derive(Debug, Clone, PartialEq)]
pub struct Deduplicated {
    pub blobs: Vec<TextBlob>,
    pub dropped_short: usize,
    pub dropped_duplicate: usize,
}

/// Keep the first blob of each distinct final text whose collapsed form is at least `min_len`
/// characters long
pub fn deduplicate(blobs: Vec<TextBlob>, min_len: usize) -> Deduplicated {
    let mut seen = HashSet::with_capacity(blobs.len());
    let mut kept = Vec::with_capacity(blobs.len());
    let mut dropped_short = 0;
    let mut dropped_duplicate = 0;

    for blob in blobs {
        let key = collapse_whitespace(blob.final_text());
        if key.chars().count() < min_len {
            dropped_short += 1;
            continue;
        }
        if !seen.insert(xxh64(key.as_bytes(), 0)) {
            debug!(source = blob.source(), "Dropping duplicate blob");
            dropped_duplicate += 1;
            continue;
        }
        kept.push(blob);
    }

    Deduplicated {
        blobs: kept,
        dropped_short,
        dropped_duplicate,
    }
}
