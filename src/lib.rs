pub mod config;
pub mod dedup;
pub mod discovery;
pub mod entity;
pub mod error;
pub mod parallel_processing;
pub mod pipeline;
pub mod policy;
pub mod reader;
pub mod stats;
pub mod text;
pub mod translation;
pub mod writer;

// Re-export main types for convenient access
pub use config::{resolve_jobs, ConfigOverrides, PrepConfig, TranslationConfig, TranslationProvider};
pub use entity::{base_domain, resolve_entity, BlobKind, EntityCategory, EntityDocument, TextBlob};
pub use error::{ConfigError, TranslationError};
pub use pipeline::{EntityPipeline, SourceText};
pub use policy::{classify, DocumentClassifierPolicy, PolicyConfig, TranslationDecision};

// Re-export translation port and providers
pub use translation::{
    create_translator, InlineReport, InlineSpanReplacer, LibreTranslateTranslator, NoopTranslator,
    Translator, TranslatorHandle,
};

// Re-export folder processing for the binary and benchmarks
pub use parallel_processing::{process_entity_folder, process_entity_folders, ProcessingOptions};
pub use stats::{write_run_stats, EntityStats, RunStats};
pub use writer::{write_entity, OutputFormat};
