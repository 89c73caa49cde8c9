use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use entity_prep::discovery::{discover_entity_folders, DiscoveryConfig};
use entity_prep::reader::ReaderConfig;
use entity_prep::{
    create_translator, process_entity_folders, resolve_jobs, write_run_stats, ConfigOverrides,
    EntityPipeline, OutputFormat, PrepConfig, ProcessingOptions, RunStats, TranslationProvider,
};

#[derive(Parser, Debug)]
#[command(name = "entity-prep")]
#[command(about = "Normalize, translate and deduplicate scraped Nepali education-sector text per organization")]
#[command(version)]
struct Args {
    /// Root directory with one sub-folder per scraped domain
    #[arg(long, default_value = "scraped_data")]
    in_root: PathBuf,

    /// Output root; entity files go to <out>/entities
    #[arg(long, default_value = "processed_tree")]
    out: PathBuf,

    /// Output writers to run
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Translation provider [default: libretranslate]
    #[arg(long, value_enum)]
    translate_provider: Option<TranslationProvider>,

    /// LibreTranslate base URL [default: http://localhost:5000]
    #[arg(long)]
    translate_endpoint: Option<String>,

    /// Per-request translation timeout in seconds [default: 30]
    #[arg(long)]
    translate_timeout_secs: Option<u64>,

    /// Characters sent for full-document translation [default: 15000]
    #[arg(long)]
    translate_char_limit: Option<usize>,

    /// Characters translated per inline replacement call [default: translate char limit]
    #[arg(long)]
    inline_char_budget: Option<usize>,

    /// Pages read from each PDF, 0 for all [default: 50]
    #[arg(long)]
    max_pdf_pages: Option<usize>,

    /// Minimum blob length in characters [default: 30]
    #[arg(long)]
    min_paragraph_len: Option<usize>,

    /// Do not replace Devanagari spans inside mostly-English text
    #[arg(long)]
    no_inline_mixed: bool,

    /// Devanagari ratio at or above which a blob is translated whole [default: 0.30]
    #[arg(long)]
    nepali_majority_threshold: Option<f64>,

    /// TOML file with defaults; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Entity folders processed concurrently
    #[arg(long, default_value_t = 1)]
    jobs: usize,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path [default: <out>/run_stats.json]
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            translate_provider: self.translate_provider,
            translate_endpoint: self.translate_endpoint.clone(),
            translate_timeout_secs: self.translate_timeout_secs,
            translate_char_limit: self.translate_char_limit,
            inline_char_budget: self.inline_char_budget,
            max_pdf_pages: self.max_pdf_pages,
            min_paragraph_len: self.min_paragraph_len,
            no_inline_mixed: self.no_inline_mixed,
            nepali_majority_threshold: self.nepali_majority_threshold,
        }
    }
}

fn progress_bar(total: usize, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Processing entities...");
    Ok(pb)
}

// WHY: the blocking HTTP client must be built and dropped outside the async runtime,
// so main stays synchronous and drives the runtime explicitly
fn main() -> Result<()> {
    // WHY: structured JSON logging enables observability and debugging in production
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting entity-prep");
    info!(?args, "Parsed CLI arguments");

    if !args.in_root.is_dir() {
        anyhow::bail!("Input root is not a directory: {}", args.in_root.display());
    }

    let base_config = match args.config {
        Some(ref path) => PrepConfig::from_toml_file(path)?,
        None => PrepConfig::default(),
    };
    let config = base_config.apply_overrides(&args.overrides());
    if let Err(e) = config.validate() {
        anyhow::bail!("Invalid configuration: {e}");
    }
    let jobs = resolve_jobs(args.jobs)?;
    info!(?config, jobs, "Configuration validated");

    let translator = create_translator(&config.translation);
    let translator_name = translator.translator.name();
    let translation_enabled = translator.enabled;
    let pipeline = Arc::new(EntityPipeline::new(&config, translator)?);

    let options = Arc::new(ProcessingOptions {
        discovery: DiscoveryConfig {
            fail_fast: args.fail_fast,
        },
        reader: ReaderConfig {
            fail_fast: args.fail_fast,
            max_pdf_pages: config.max_pdf_pages,
        },
        out_dir: args.out.clone(),
        format: args.format,
        jobs,
    });
    let stats_path = args
        .stats_out
        .clone()
        .unwrap_or_else(|| args.out.join("run_stats.json"));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let run_stats = runtime.block_on(async {
        let run_start = Instant::now();
        let mut run_stats = RunStats::new(translator_name, translation_enabled);

        tokio::fs::create_dir_all(&args.out).await?;
        let folders = discover_entity_folders(&args.in_root).await?;
        let pb = progress_bar(folders.len(), args.no_progress)?;

        let entity_stats = process_entity_folders(folders, pipeline.clone(), options, |stats| {
            pb.set_message(stats.domain.clone());
            pb.inc(1);
        })
        .await?;
        pb.finish_with_message("Done");

        for stats in entity_stats {
            run_stats.push(stats);
        }
        run_stats.cache_entries = pipeline.replacer().cache_len() as u64;
        run_stats.total_processing_time_ms = run_start.elapsed().as_millis() as u64;

        write_run_stats(&stats_path, &run_stats).await?;
        info!("Run statistics written to {}", stats_path.display());
        Ok::<_, anyhow::Error>(run_stats)
    })?;
    drop(runtime);

    info!(
        written = run_stats.entities_written,
        empty = run_stats.entities_empty,
        failed = run_stats.entities_failed,
        "Run completed"
    );

    println!("entity-prep v{} - run complete", env!("CARGO_PKG_VERSION"));
    println!(
        "Wrote {} entity files to {}",
        run_stats.entities_written,
        args.out.join("entities").display()
    );
    if run_stats.entities_failed > 0 {
        println!("Failed entity folders: {}", run_stats.entities_failed);
    }

    Ok(())
}
