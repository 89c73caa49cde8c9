use anyhow::Result;
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::entity::BlobKind;

/// Configuration for source discovery behavior
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
}

/// A source file found inside an entity folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: BlobKind,
}

/// Sub-directory and extension searched for each source kind, in processing order
const SOURCE_LAYOUT: [(&str, &str, BlobKind); 2] = [
    ("text", "txt", BlobKind::PlainText),
    ("docs", "pdf", BlobKind::PdfExtracted),
];

/// Lists the immediate sub-directories of `root`, one per scraped domain, sorted by name.
pub async fn discover_entity_folders(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut entries = fs::read_dir(root).await?;
    let mut folders = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            folders.push(entry.path());
        } else {
            debug!("Ignoring non-directory entry: {}", entry.path().display());
        }
    }

    folders.sort();
    info!("Discovered {} entity folders in {}", folders.len(), root.display());
    Ok(folders)
}

/// Collects `text/**/*.txt` then `docs/**/*.pdf` under an entity folder, each group sorted.
///
/// Unreadable glob entries are logged and skipped unless `fail_fast` is set.
pub fn collect_entity_sources(folder: &Path, config: &DiscoveryConfig) -> Result<Vec<SourceFile>> {
    let escaped_root = Pattern::escape(&folder.to_string_lossy());
    let mut sources = Vec::new();

    for (subdir, extension, kind) in SOURCE_LAYOUT {
        let pattern = format!("{escaped_root}/{subdir}/**/*.{extension}");
        debug!("Searching sources with pattern: {}", pattern);

        let mut paths = Vec::new();
        for entry in glob(&pattern)? {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(path) => debug!("Skipping non-file match: {}", path.display()),
                Err(e) => {
                    let error_msg = format!("Glob iteration error in {}: {e}", folder.display());
                    if config.fail_fast {
                        return Err(anyhow::anyhow!(error_msg));
                    }
                    warn!("{}", error_msg);
                }
            }
        }

        paths.sort();
        sources.extend(paths.into_iter().map(|path| SourceFile { path, kind }));
    }

    debug!("Found {} sources in {}", sources.len(), folder.display());
    Ok(sources)
}
