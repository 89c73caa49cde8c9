// WHY: a run over dozens of domains needs a machine-readable record of what each folder produced
// Written as JSON next to the entity files unless --stats-out points elsewhere

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;

use crate::policy::TranslationDecision;
use crate::translation::InlineReport;

pub const STATUS_WRITTEN: &str = "written";
pub const STATUS_EMPTY: &str = "empty";
pub const STATUS_FAILED: &str = "failed";

/// Per-entity processing statistics
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EntityStats {
    pub domain: String,
    pub name: String,
    /// Source files discovered under text/ and docs/
    pub files_seen: u64,
    /// Blobs that passed normalization and the length floor
    pub blobs_built: u64,
    /// Blobs left after deduplication
    pub blobs_kept: u64,
    pub dropped_short: u64,
    pub dropped_duplicate: u64,
    pub full_translations: u64,
    pub inline_translations: u64,
    pub identity: u64,
    pub untranslated: u64,
    /// Spans sent to the translator by inline replacement
    pub inline_spans_translated: u64,
    pub inline_cache_hits: u64,
    pub inline_spans_skipped: u64,
    pub processing_time_ms: u64,
    /// written, empty or failed
    pub status: String,
    pub error: Option<String>,
}

impl EntityStats {
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn record_decision(&mut self, decision: TranslationDecision, inline: Option<&InlineReport>) {
        match decision {
            TranslationDecision::FullDocument => self.full_translations += 1,
            TranslationDecision::Inline => self.inline_translations += 1,
            TranslationDecision::Identity => self.identity += 1,
            TranslationDecision::Untranslated => self.untranslated += 1,
        }
        if let Some(report) = inline {
            self.inline_spans_translated += report.translated as u64;
            self.inline_cache_hits += report.cache_hits as u64;
            self.inline_spans_skipped += report.skipped_for_budget as u64;
        }
    }
}

/// Whole-run statistics
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Seconds since the Unix epoch when the run started
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub translator: String,
    pub translation_enabled: bool,
    pub entities_written: u64,
    pub entities_empty: u64,
    pub entities_failed: u64,
    pub total_files_seen: u64,
    pub total_blobs_kept: u64,
    /// Distinct spans in the inline translation cache at the end of the run
    pub cache_entries: u64,
    pub entity_stats: Vec<EntityStats>,
}

impl RunStats {
    pub fn new(translator: &str, translation_enabled: bool) -> Self {
        let run_start = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        Self {
            run_start,
            translator: translator.to_string(),
            translation_enabled,
            ..Self::default()
        }
    }

    /// Fold one entity's stats into the totals
    pub fn push(&mut self, stats: EntityStats) {
        match stats.status.as_str() {
            STATUS_WRITTEN => self.entities_written += 1,
            STATUS_FAILED => self.entities_failed += 1,
            _ => self.entities_empty += 1,
        }
        self.total_files_seen += stats.files_seen;
        self.total_blobs_kept += stats.blobs_kept;
        self.entity_stats.push(stats);
    }
}

/// Write run statistics as pretty JSON, creating parent directories
pub async fn write_run_stats(path: &Path, stats: &RunStats) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(stats)?;
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(json.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_decision_counts_inline_report() {
        let mut stats = EntityStats::new("tu.edu.np", "Tribhuvan University");
        let report = InlineReport {
            spans_seen: 4,
            cache_hits: 1,
            translated: 2,
            skipped_for_budget: 1,
            budget_used: 12,
        };
        stats.record_decision(TranslationDecision::Inline, Some(&report));
        stats.record_decision(TranslationDecision::Identity, None);

        assert_eq!(stats.inline_translations, 1);
        assert_eq!(stats.identity, 1);
        assert_eq!(stats.inline_spans_translated, 2);
        assert_eq!(stats.inline_cache_hits, 1);
        assert_eq!(stats.inline_spans_skipped, 1);
    }

    #[test]
    fn test_push_updates_totals() {
        let mut run = RunStats::new("noop", false);
        let mut written = EntityStats::new("ku.edu.np", "Kathmandu University");
        written.status = STATUS_WRITTEN.to_string();
        written.files_seen = 3;
        written.blobs_kept = 2;
        let mut failed = EntityStats::new("bad", "bad");
        failed.status = STATUS_FAILED.to_string();

        run.push(written);
        run.push(failed);

        assert_eq!(run.entities_written, 1);
        assert_eq!(run.entities_failed, 1);
        assert_eq!(run.total_files_seen, 3);
        assert_eq!(run.total_blobs_kept, 2);
        assert_eq!(run.entity_stats.len(), 2);
    }

    #[tokio::test]
    async fn test_write_run_stats_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("run_stats.json");

        write_run_stats(&path, &RunStats::new("noop", false)).await.unwrap();

        let parsed: RunStats =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.translator, "noop");
        assert!(!parsed.translation_enabled);
    }
}
