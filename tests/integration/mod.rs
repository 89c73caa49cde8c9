// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use entity_prep::discovery::DiscoveryConfig;
use entity_prep::reader::ReaderConfig;
use entity_prep::{
    OutputFormat, ProcessingOptions, Translator, TranslationError, TranslatorHandle,
};

pub const ENGLISH_ABOUT: &str =
    "Tribhuvan University is the oldest university in Nepal, established in 1959.";
pub const NEPALI_NOTICE: &str =
    "त्रिभुवन विश्वविद्यालयले स्नातक तहको परीक्षा तालिका प्रकाशित गरेको छ।";
pub const MIXED_NOTICE: &str =
    "The examination for नेपाल सरकार scholarship holders begins next week at the central campus.";

/// Test fixture helper for creating a scraped-data tree of domain folders
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Root holding one folder per domain
    pub fn in_root(&self) -> PathBuf {
        self.root_path.join("scraped_data")
    }

    /// Output root for entity files and stats
    pub fn out_dir(&self) -> PathBuf {
        self.root_path.join("processed_tree")
    }

    pub fn domain_folder(&self, domain: &str) -> PathBuf {
        self.in_root().join(domain)
    }

    /// Write a source file below `<in_root>/<domain>/`
    pub fn create_source<P: AsRef<Path>>(&self, domain: &str, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.domain_folder(domain).join(relative_path);

        // Create parent directories if needed
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// A domain folder with English, Nepali, mixed, duplicate, short and broken-PDF sources
    pub fn create_tribhuvan_folder(&self) -> PathBuf {
        let domain = "www.tu.edu.np";
        self.create_source(domain, "text/about.txt", ENGLISH_ABOUT.as_bytes());
        self.create_source(domain, "text/copy.txt", format!("  {ENGLISH_ABOUT}\n").as_bytes());
        self.create_source(domain, "text/mixed.txt", MIXED_NOTICE.as_bytes());
        self.create_source(domain, "text/notice.txt", NEPALI_NOTICE.as_bytes());
        self.create_source(domain, "text/short.txt", b"Home");
        self.create_source(domain, "docs/broken.pdf", b"%PDF-1.4 truncated");
        self.domain_folder(domain)
    }

    pub fn processing_options(&self, format: OutputFormat, fail_fast: bool) -> Arc<ProcessingOptions> {
        Arc::new(ProcessingOptions {
            discovery: DiscoveryConfig { fail_fast },
            reader: ReaderConfig {
                fail_fast,
                max_pdf_pages: 50,
            },
            out_dir: self.out_dir(),
            format,
            jobs: 1,
        })
    }

    /// Read `<out>/entities/<slug>.json` as JSON
    pub fn read_entity_json(&self, slug: &str) -> serde_json::Value {
        let path = self.out_dir().join("entities").join(format!("{slug}.json"));
        let content = fs::read_to_string(&path).expect("Failed to read entity JSON");
        serde_json::from_str(&content).expect("Entity JSON should parse")
    }
}

/// Answers with the input length, e.g. `EN[11]`, and counts calls
#[derive(Default)]
pub struct LengthTranslator {
    pub calls: AtomicUsize,
}

impl Translator for LengthTranslator {
    fn name(&self) -> &'static str {
        "length"
    }

    fn try_translate(&self, text: &str) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("EN[{}]", text.chars().count()))
    }
}

/// Provider that is always down
#[derive(Default)]
pub struct UnavailableTranslator {
    pub calls: AtomicUsize,
}

impl Translator for UnavailableTranslator {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn try_translate(&self, _text: &str) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TranslationError::Unavailable("service offline".to_string()))
    }
}

pub fn enabled_handle(translator: Arc<dyn Translator>) -> TranslatorHandle {
    TranslatorHandle {
        translator,
        enabled: true,
    }
}
