// WHY: entity folders are independent, so up to --jobs of them run at once
// Results come back in folder order; CPU and translation work runs on the blocking pool

use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::discovery::{collect_entity_sources, DiscoveryConfig};
use crate::entity::{resolve_entity, EntityIdentity};
use crate::pipeline::EntityPipeline;
use crate::reader::{load_source, ReaderConfig};
use crate::stats::{EntityStats, STATUS_EMPTY, STATUS_FAILED, STATUS_WRITTEN};
use crate::writer::{write_entity, OutputFormat};

/// Settings shared by every folder worker
#[derive(Debug, Clone)]
pub struct ProcessingOptions {
    pub discovery: DiscoveryConfig,
    pub reader: ReaderConfig,
    pub out_dir: PathBuf,
    pub format: OutputFormat,
    /// Folders processed concurrently; 1 is sequential
    pub jobs: usize,
}

impl ProcessingOptions {
    fn fail_fast(&self) -> bool {
        self.discovery.fail_fast || self.reader.fail_fast
    }
}

/// Identity for a folder, taken from its directory name
pub fn folder_identity(folder: &Path) -> EntityIdentity {
    let name = folder
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    resolve_entity(&name)
}

/// Discover, read, process and write one entity folder
pub async fn process_entity_folder(
    folder: PathBuf,
    pipeline: Arc<EntityPipeline>,
    options: Arc<ProcessingOptions>,
) -> Result<EntityStats> {
    let start_time = Instant::now();
    let identity = folder_identity(&folder);
    info!("Processing entity folder: {}", folder.display());

    let discovery_config = options.discovery.clone();
    let discovery_folder = folder.clone();
    let source_files = tokio::task::spawn_blocking(move || {
        collect_entity_sources(&discovery_folder, &discovery_config)
    })
    .await??;

    let files: Vec<String> = source_files
        .iter()
        .map(|file| file.path.display().to_string())
        .collect();

    let mut sources = Vec::with_capacity(source_files.len());
    for file in &source_files {
        if let Some(source) = load_source(file, &options.reader).await? {
            sources.push(source);
        }
    }

    let build_pipeline = pipeline.clone();
    let (document, mut stats) = tokio::task::spawn_blocking(move || {
        build_pipeline.build_document(identity, files, sources)
    })
    .await?;

    stats.status = match document {
        Some(ref document) => {
            write_entity(&options.out_dir, document, options.format).await?;
            STATUS_WRITTEN.to_string()
        }
        None => STATUS_EMPTY.to_string(),
    };
    stats.processing_time_ms = start_time.elapsed().as_millis() as u64;
    Ok(stats)
}

/// Process folders with bounded concurrency, reporting each finished folder to `on_done`
///
/// A failing folder is recorded as failed and the run continues, unless fail-fast is set.
pub async fn process_entity_folders<F>(
    folders: Vec<PathBuf>,
    pipeline: Arc<EntityPipeline>,
    options: Arc<ProcessingOptions>,
    mut on_done: F,
) -> Result<Vec<EntityStats>>
where
    F: FnMut(&EntityStats),
{
    let jobs = options.jobs.max(1);
    info!("Processing {} entity folders with {} jobs", folders.len(), jobs);

    let mut results = stream::iter(folders.into_iter().map(|folder| {
        let pipeline = pipeline.clone();
        let options = options.clone();
        async move {
            let started = Instant::now();
            let outcome = process_entity_folder(folder.clone(), pipeline, options).await;
            (folder, started, outcome)
        }
    }))
    .buffered(jobs);

    let mut all_stats = Vec::new();
    while let Some((folder, started, outcome)) = results.next().await {
        let stats = match outcome {
            Ok(stats) => stats,
            Err(e) => {
                if options.fail_fast() {
                    return Err(e.context(format!("Failed to process {}", folder.display())));
                }
                warn!("Failed to process {} (continuing): {:#}", folder.display(), e);
                let identity = folder_identity(&folder);
                let mut stats = EntityStats::new(identity.domain, identity.name);
                stats.status = STATUS_FAILED.to_string();
                stats.error = Some(format!("{e:#}"));
                stats.processing_time_ms = started.elapsed().as_millis() as u64;
                stats
            }
        };
        on_done(&stats);
        all_stats.push(stats);
    }

    Ok(all_stats)
}
