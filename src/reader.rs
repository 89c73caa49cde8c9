use anyhow::Result;
use std::path::Path;
use tracing::{debug, warn};

use crate::discovery::SourceFile;
use crate::entity::BlobKind;
use crate::pipeline::SourceText;

/// Configuration for source reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Pages read from each PDF; 0 reads every page
    pub max_pdf_pages: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_pdf_pages: 50,
        }
    }
}

/// Decode UTF-8, dropping byte sequences that are not valid UTF-8
pub fn decode_utf8_ignoring_invalid(bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    let mut rest = bytes;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                decoded.push_str(valid);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                // valid_up_to guarantees this prefix is UTF-8
                decoded.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(len) => rest = &after[len..],
                    // truncated sequence at end of input
                    None => break,
                }
            }
        }
    }

    decoded
}

/// Read a plain-text source; `None` when it holds only whitespace
pub async fn read_text_source(path: &Path) -> Result<Option<String>> {
    let bytes = tokio::fs::read(path).await?;
    let text = decode_utf8_ignoring_invalid(&bytes);
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok((!text.trim().is_empty()).then_some(text))
}

/// Extract text from up to `page_cap` pages of a PDF, joining pages with blank lines
///
/// Only the capped pages are parsed. Malformed PDFs can panic inside the extractor; a panic
/// counts as "no text".
pub fn extract_pdf_text(bytes: &[u8], page_cap: usize) -> Option<String> {
    let extracted = std::panic::catch_unwind(|| -> Result<Vec<String>, pdf_extract::OutputError> {
        let mut doc = pdf_extract::Document::load_mem(bytes)?;
        if doc.is_encrypted() {
            doc.decrypt("")?;
        }
        let page_count = doc.get_pages().len() as u32;
        Ok(collect_pages(page_count, page_cap, |page_num| {
            extract_pdf_page(&doc, page_num)
        }))
    });

    let pages = match extracted {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            debug!("PDF extraction failed: {}", e);
            return None;
        }
        Err(_) => {
            debug!("PDF extractor panicked");
            return None;
        }
    };

    let text = pages.join("\n\n");
    (!text.trim().is_empty()).then_some(text)
}

fn extract_pdf_page(
    doc: &pdf_extract::Document,
    page_num: u32,
) -> Result<String, pdf_extract::OutputError> {
    let mut text = String::new();
    {
        let mut output = pdf_extract::PlainTextOutput::new(&mut text);
        pdf_extract::output_doc_page(doc, &mut output, page_num)?;
    }
    Ok(text)
}

/// Run `extract_page` on pages `1..=min(page_cap, page_count)` (all pages when the cap is 0),
/// stopping at the first page that fails
fn collect_pages<F, E>(page_count: u32, page_cap: usize, mut extract_page: F) -> Vec<String>
where
    F: FnMut(u32) -> Result<String, E>,
    E: std::fmt::Display,
{
    let last = if page_cap == 0 {
        page_count
    } else {
        page_count.min(u32::try_from(page_cap).unwrap_or(u32::MAX))
    };

    let mut pages = Vec::with_capacity(last as usize);
    for page_num in 1..=last {
        match extract_page(page_num) {
            Ok(text) => pages.push(text),
            Err(e) => {
                debug!("Stopping PDF extraction at page {}: {}", page_num, e);
                break;
            }
        }
    }
    pages
}

/// Load one discovered source into raw text
///
/// Read failures are warnings unless `fail_fast` is set; sources without text yield `Ok(None)`.
pub async fn load_source(file: &SourceFile, config: &ReaderConfig) -> Result<Option<SourceText>> {
    let source = file.path.display().to_string();

    let raw = match file.kind {
        BlobKind::PlainText => match read_text_source(&file.path).await {
            Ok(text) => text,
            Err(e) => {
                let error_msg = format!("Failed to read {}: {}", source, e);
                if config.fail_fast {
                    return Err(anyhow::anyhow!(error_msg));
                }
                warn!("{}", error_msg);
                None
            }
        },
        BlobKind::PdfExtracted => match tokio::fs::read(&file.path).await {
            Ok(bytes) => {
                let page_cap = config.max_pdf_pages;
                let extracted =
                    tokio::task::spawn_blocking(move || extract_pdf_text(&bytes, page_cap)).await?;
                if extracted.is_none() {
                    warn!("No text extracted from PDF: {}", source);
                }
                extracted
            }
            Err(e) => {
                let error_msg = format!("Failed to read {}: {}", source, e);
                if config.fail_fast {
                    return Err(anyhow::anyhow!(error_msg));
                }
                warn!("{}", error_msg);
                None
            }
        },
    };

    Ok(raw.map(|raw| SourceText {
        source,
        kind: file.kind,
        raw,
    }))
}
