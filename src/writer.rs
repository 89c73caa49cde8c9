// WHY: downstream indexing reads the JSON; the Markdown is for humans skimming what was collected
// Both land in <out>/entities/<slug>.<ext>

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::entity::EntityDocument;
use crate::policy::truncate_chars;

/// Characters of blob text shown per Markdown section
const MARKDOWN_PREVIEW_CHARS: usize = 1200;

/// Which writers run for each entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Md,
    Both,
}

impl OutputFormat {
    fn writes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    fn writes_markdown(self) -> bool {
        matches!(self, OutputFormat::Md | OutputFormat::Both)
    }
}

/// File stem for an entity name: lowercase ASCII alphanumerics joined by single hyphens
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        "entity".to_string()
    } else {
        slug
    }
}

/// Render an entity as a Markdown summary
pub fn to_markdown(document: &EntityDocument) -> String {
    let mut lines = vec![
        format!("# {}", document.name),
        String::new(),
        format!("Domain: {}", document.domain),
        format!("Type: {}", document.entity_type.as_str()),
        String::new(),
        "## Sources".to_string(),
    ];

    let mut files: Vec<&str> = document.files.iter().map(String::as_str).collect();
    files.sort_unstable();
    files.dedup();
    lines.extend(files.into_iter().map(|file| format!("- {file}")));

    lines.push(String::new());
    lines.push("## Collected Text (English where available)".to_string());

    for (index, blob) in document.blobs.iter().enumerate() {
        let text = blob.final_text().trim();
        let preview = if text.chars().count() > MARKDOWN_PREVIEW_CHARS {
            format!("{} …", truncate_chars(text, MARKDOWN_PREVIEW_CHARS))
        } else {
            text.to_string()
        };
        lines.push(format!(
            "\n### Blob {} ({})\nSource: {}\nLang: {}\n\n{}\n",
            index + 1,
            blob.kind().as_str(),
            blob.source(),
            blob.lang(),
            preview
        ));
    }

    lines.join("\n")
}

/// Write the entity in the requested formats, returning the paths written
pub async fn write_entity(
    out_dir: &Path,
    document: &EntityDocument,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let entities_dir = out_dir.join("entities");
    tokio::fs::create_dir_all(&entities_dir).await?;

    let slug = slugify(&document.name);
    let mut written = Vec::new();

    if format.writes_json() {
        let path = entities_dir.join(format!("{slug}.json"));
        tokio::fs::write(&path, serde_json::to_string_pretty(document)?).await?;
        written.push(path);
    }
    if format.writes_markdown() {
        let path = entities_dir.join(format!("{slug}.md"));
        tokio::fs::write(&path, to_markdown(document)).await?;
        written.push(path);
    }

    debug!("Wrote {} files for {}", written.len(), document.domain);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{resolve_entity, BlobKind, TextBlob};
    use tempfile::TempDir;

    fn sample_document() -> EntityDocument {
        let mut document = EntityDocument::new(resolve_entity("afu.edu.np"));
        document.add_file("afu/text/b.txt");
        document.add_file("afu/text/a.txt");
        document.blobs.push(TextBlob::new(
            "afu/text/a.txt",
            BlobKind::PlainText,
            "ne",
            "कृषि तथा वन विज्ञान विश्वविद्यालय",
            Some("Agriculture and Forestry University".to_string()),
        ));
        document
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Agriculture and Forestry University"), "agriculture-and-forestry-university");
        assert_eq!(slugify("University Grants Commission, Nepal"), "university-grants-commission-nepal");
        assert_eq!(slugify("B. P. Koirala Institute"), "b-p-koirala-institute");
        assert_eq!(slugify("--tu.edu.np--"), "tu-edu-np");
        assert_eq!(slugify("नेपाल"), "entity");
    }

    #[test]
    fn test_markdown_layout() {
        let markdown = to_markdown(&sample_document());

        assert!(markdown.starts_with("# Agriculture and Forestry University\n\nDomain: afu.edu.np\nType: university\n"));
        let a = markdown.find("- afu/text/a.txt").unwrap();
        let b = markdown.find("- afu/text/b.txt").unwrap();
        assert!(a < b);
        assert!(markdown.contains("### Blob 1 (txt)\nSource: afu/text/a.txt\nLang: ne\n\nAgriculture and Forestry University\n"));
    }

    #[test]
    fn test_markdown_truncates_long_text() {
        let mut document = EntityDocument::new(resolve_entity("tu.edu.np"));
        document.blobs.push(TextBlob::new(
            "tu/docs/long.pdf",
            BlobKind::PdfExtracted,
            "en",
            "x".repeat(1500),
            None,
        ));

        let markdown = to_markdown(&document);
        let expected = format!("{} …", "x".repeat(1200));
        assert!(markdown.contains(&expected));
        assert!(!markdown.contains(&"x".repeat(1201)));
    }

    #[tokio::test]
    async fn test_write_entity_both_formats() {
        let temp_dir = TempDir::new().unwrap();
        let document = sample_document();

        let written = write_entity(temp_dir.path(), &document, OutputFormat::Both)
            .await
            .unwrap();

        let entities = temp_dir.path().join("entities");
        assert_eq!(
            written,
            vec![
                entities.join("agriculture-and-forestry-university.json"),
                entities.join("agriculture-and-forestry-university.md"),
            ]
        );

        let json = std::fs::read_to_string(&written[0]).unwrap();
        assert!(json.contains("कृषि"), "non-ASCII text must be written verbatim");
        let parsed: EntityDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, document);
    }

    #[tokio::test]
    async fn test_write_entity_json_only() {
        let temp_dir = TempDir::new().unwrap();
        let written = write_entity(temp_dir.path(), &sample_document(), OutputFormat::Json)
            .await
            .unwrap();
        assert_eq!(written.len(), 1);
        assert!(!temp_dir
            .path()
            .join("entities/agriculture-and-forestry-university.md")
            .exists());
    }
}
