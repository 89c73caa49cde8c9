//! Per-entity orchestration: raw source text in, deduplicated [`EntityDocument`] out.
//!
//! Synchronous by design of its callers: the binary runs it on the blocking pool because the
//! translator may block on HTTP.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::PrepConfig;
use crate::dedup::deduplicate;
use crate::entity::{BlobKind, EntityDocument, EntityIdentity, TextBlob};
use crate::policy::{DocumentClassifierPolicy, PolicyConfig, TranslationDecision};
use crate::stats::EntityStats;
use crate::text::{detect_language, normalize_text, script_ratio, ScriptBlockDetector, SpanDetector};
use crate::translation::{InlineReport, InlineSpanReplacer, TranslatorHandle};

/// Raw text read from one source file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceText {
    pub source: String,
    pub kind: BlobKind,
    pub raw: String,
}

/// A blob together with how the policy treated it
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBlob {
    pub blob: TextBlob,
    pub decision: TranslationDecision,
    pub inline_report: Option<InlineReport>,
}

/// Normalize, measure, classify and deduplicate the sources of one entity
///
/// One pipeline serves a whole run so the inline translation cache is shared by every entity.
pub struct EntityPipeline {
    min_paragraph_length: usize,
    language_detection_min_chars: usize,
    detector: Arc<dyn SpanDetector>,
    replacer: Arc<InlineSpanReplacer>,
    policy: DocumentClassifierPolicy,
}

impl EntityPipeline {
    /// Pipeline detecting Devanagari spans
    pub fn new(config: &PrepConfig, translator: TranslatorHandle) -> Result<Self> {
        let detector = Arc::new(ScriptBlockDetector::devanagari()?);
        Ok(Self::with_detector(config, translator, detector))
    }

    /// Pipeline with a caller-supplied span detector
    pub fn with_detector(
        config: &PrepConfig,
        translator: TranslatorHandle,
        detector: Arc<dyn SpanDetector>,
    ) -> Self {
        let replacer = Arc::new(InlineSpanReplacer::new(
            translator.translator.clone(),
            detector.clone(),
        ));
        let policy = DocumentClassifierPolicy::new(
            PolicyConfig::from_prep_config(config, translator.enabled),
            translator.translator,
            replacer.clone(),
        );
        Self {
            min_paragraph_length: config.min_paragraph_length,
            language_detection_min_chars: config.language_detection_min_chars,
            detector,
            replacer,
            policy,
        }
    }

    pub fn replacer(&self) -> &Arc<InlineSpanReplacer> {
        &self.replacer
    }

    pub fn policy(&self) -> &DocumentClassifierPolicy {
        &self.policy
    }

    /// Turn one source into a blob; `None` when its normalized text is empty or too short
    pub fn prepare_blob(&self, source: &SourceText) -> Option<PreparedBlob> {
        let normalized = normalize_text(&source.raw);
        let chars = normalized.chars().count();
        if normalized.trim().is_empty() || chars < self.min_paragraph_length {
            debug!(source = %source.source, chars, "Skipping short source");
            return None;
        }

        let lang = detect_language(&normalized, self.language_detection_min_chars);
        let ratio = script_ratio(self.detector.as_ref(), &normalized);
        let outcome = self.policy.resolve(&normalized, ratio, &lang);

        Some(PreparedBlob {
            blob: TextBlob::new(
                source.source.clone(),
                source.kind,
                lang,
                normalized,
                outcome.translated,
            ),
            decision: outcome.decision,
            inline_report: outcome.inline_report,
        })
    }

    /// Build the document for one entity
    ///
    /// `files` lists every discovered path; `sources` holds the ones that produced text. The
    /// document is `None` when no source yielded a blob.
    pub fn build_document(
        &self,
        identity: EntityIdentity,
        files: Vec<String>,
        sources: Vec<SourceText>,
    ) -> (Option<EntityDocument>, EntityStats) {
        let mut stats = EntityStats::new(identity.domain.clone(), identity.name.clone());
        let mut document = EntityDocument::new(identity);
        for file in files {
            document.add_file(file);
        }
        stats.files_seen = document.files.len() as u64;

        let mut blobs = Vec::with_capacity(sources.len());
        for source in &sources {
            if let Some(prepared) = self.prepare_blob(source) {
                stats.record_decision(prepared.decision, prepared.inline_report.as_ref());
                blobs.push(prepared.blob);
            }
        }
        stats.blobs_built = blobs.len() as u64;

        if blobs.is_empty() {
            info!(domain = %document.domain, "No usable text for entity");
            return (None, stats);
        }

        let deduplicated = deduplicate(blobs, self.min_paragraph_length);
        stats.dropped_short = deduplicated.dropped_short as u64;
        stats.dropped_duplicate = deduplicated.dropped_duplicate as u64;
        stats.blobs_kept = deduplicated.blobs.len() as u64;
        document.blobs = deduplicated.blobs;

        info!(
            domain = %document.domain,
            files = stats.files_seen,
            blobs = stats.blobs_kept,
            duplicates = stats.dropped_duplicate,
            "Built entity document"
        );
        (Some(document), stats)
    }
}
