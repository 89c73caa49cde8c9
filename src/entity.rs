//! Output data model: one [`EntityDocument`] per organization folder, made of [`TextBlob`]s.

use serde::{Deserialize, Serialize};

/// Where a blob's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlobKind {
    #[serde(rename = "txt")]
    PlainText,
    #[serde(rename = "pdf")]
    PdfExtracted,
}

impl BlobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobKind::PlainText => "txt",
            BlobKind::PdfExtracted => "pdf",
        }
    }
}

/// Normalized text of one source file plus its optional English rendering
///
/// Built once with its final translation; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlob {
    source: String,
    kind: BlobKind,
    lang: String,
    text_norm: String,
    text_en: Option<String>,
}

impl TextBlob {
    pub fn new(
        source: impl Into<String>,
        kind: BlobKind,
        lang: impl Into<String>,
        text_norm: impl Into<String>,
        text_en: Option<String>,
    ) -> Self {
        Self {
            source: source.into(),
            kind,
            lang: lang.into(),
            text_norm: text_norm.into(),
            text_en,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> BlobKind {
        self.kind
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn normalized(&self) -> &str {
        &self.text_norm
    }

    pub fn translated(&self) -> Option<&str> {
        self.text_en.as_deref()
    }

    /// Translated text when present, normalized text otherwise
    pub fn final_text(&self) -> &str {
        self.text_en.as_deref().unwrap_or(&self.text_norm)
    }
}

/// Kind of organization a domain belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    University,
    Academy,
    Institute,
    Council,
    Board,
    Ministry,
    Commission,
    Department,
    Organization,
}

impl EntityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::University => "university",
            EntityCategory::Academy => "academy",
            EntityCategory::Institute => "institute",
            EntityCategory::Council => "council",
            EntityCategory::Board => "board",
            EntityCategory::Ministry => "ministry",
            EntityCategory::Commission => "commission",
            EntityCategory::Department => "department",
            EntityCategory::Organization => "organization",
        }
    }
}

/// Canonical identity resolved from a domain folder name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityIdentity {
    pub name: String,
    pub domain: String,
    pub category: EntityCategory,
}

/// Known education-sector domains and the organization behind each
const DOMAIN_MAP: &[(&str, &str, EntityCategory)] = &[
    ("tu.edu.np", "Tribhuvan University", EntityCategory::University),
    ("ku.edu.np", "Kathmandu University", EntityCategory::University),
    ("purbanchaluniversity.edu.np", "Purbanchal University", EntityCategory::University),
    ("pu.edu.np", "Pokhara University", EntityCategory::University),
    ("afu.edu.np", "Agriculture and Forestry University", EntityCategory::University),
    ("fwu.edu.np", "Far Western University", EntityCategory::University),
    ("mwu.edu.np", "Mid-Western University", EntityCategory::University),
    ("rju.edu.np", "Rajshree Janak University", EntityCategory::University),
    ("uon.edu.np", "University of Nepal", EntityCategory::University),
    ("nou.edu.np", "Nepal Open University", EntityCategory::University),
    ("mbust.edu.np", "Madan Bhandari University of Science and Technology", EntityCategory::University),
    ("nsu.edu.np", "Nepal Sanskrit University", EntityCategory::University),
    ("lbu.edu.np", "Lumbini Buddhist University", EntityCategory::University),
    ("mtu.edu.np", "Manmohan Technical University", EntityCategory::University),
    ("gandakiuniversity.edu.np", "Gandaki University", EntityCategory::University),
    ("mau.edu.np", "Madhesh University", EntityCategory::University),
    ("ltu.edu.np", "Lumbini Technical University", EntityCategory::University),
    ("bagmatiuniversity.edu.np", "Bagmati University", EntityCategory::University),
    ("nams.edu.np", "National Academy of Medical Sciences", EntityCategory::Academy),
    ("bpkihs.edu", "B. P. Koirala Institute of Health Sciences", EntityCategory::Institute),
    ("pahs.edu.np", "Patan Academy of Health Sciences", EntityCategory::Academy),
    ("kahs.edu.np", "Karnali Academy of Health Sciences", EntityCategory::Academy),
    ("ctevt.org.np", "Council for Technical Education and Vocational Training", EntityCategory::Council),
    ("neb.gov.np", "National Examinations Board", EntityCategory::Board),
    ("moest.gov.np", "Ministry of Education, Science and Technology", EntityCategory::Ministry),
    ("ugcnepal.edu.np", "University Grants Commission, Nepal", EntityCategory::Commission),
    ("doe.gov.np", "Department of Education", EntityCategory::Department),
];

/// Reduce a folder name or URL to its bare domain
pub fn base_domain(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let without_scheme = lowered.replace("https://", "").replace("http://", "");
    let mut domain = without_scheme.trim_matches('/');
    domain = domain.strip_prefix("www.").unwrap_or(domain);
    domain = domain.strip_prefix("web.").unwrap_or(domain);
    domain.to_string()
}

/// Canonical name and category for a domain; unknown domains name themselves
pub fn resolve_entity(folder_name: &str) -> EntityIdentity {
    let domain = base_domain(folder_name);
    match DOMAIN_MAP.iter().find(|(known, _, _)| *known == domain) {
        Some((_, name, category)) => EntityIdentity {
            name: (*name).to_string(),
            domain,
            category: *category,
        },
        None => EntityIdentity {
            name: domain.clone(),
            domain,
            category: EntityCategory::Organization,
        },
    }
}

/// Everything collected for one organization during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDocument {
    pub name: String,
    pub domain: String,
    pub entity_type: EntityCategory,
    /// Every discovered source path, first occurrence order, no repeats
    pub files: Vec<String>,
    pub blobs: Vec<TextBlob>,
}

impl EntityDocument {
    pub fn new(identity: EntityIdentity) -> Self {
        Self {
            name: identity.name,
            domain: identity.domain,
            entity_type: identity.category,
            files: Vec::new(),
            blobs: Vec::new(),
        }
    }

    /// Record a source path unless it is already listed
    pub fn add_file(&mut self, path: impl Into<String>) {
        let path = path.into();
        if !self.files.contains(&path) {
            self.files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_domain_strips_prefixes() {
        assert_eq!(base_domain("www.tu.edu.np"), "tu.edu.np");
        assert_eq!(base_domain("https://www.ku.edu.np/"), "ku.edu.np");
        assert_eq!(base_domain("WEB.NEB.GOV.NP"), "neb.gov.np");
        assert_eq!(base_domain("  afu.edu.np  "), "afu.edu.np");
    }

    #[test]
    fn test_resolve_known_domain() {
        let identity = resolve_entity("www.moest.gov.np");
        assert_eq!(identity.name, "Ministry of Education, Science and Technology");
        assert_eq!(identity.domain, "moest.gov.np");
        assert_eq!(identity.category, EntityCategory::Ministry);
    }

    #[test]
    fn test_resolve_unknown_domain() {
        let identity = resolve_entity("example.com.np");
        assert_eq!(identity.name, "example.com.np");
        assert_eq!(identity.category, EntityCategory::Organization);
    }

    #[test]
    fn test_final_text_prefers_translation() {
        let plain = TextBlob::new("a.txt", BlobKind::PlainText, "en", "normalized", None);
        assert_eq!(plain.final_text(), "normalized");

        let translated = TextBlob::new(
            "b.pdf",
            BlobKind::PdfExtracted,
            "ne",
            "नेपाल",
            Some("Nepal".to_string()),
        );
        assert_eq!(translated.final_text(), "Nepal");
    }

    #[test]
    fn test_files_are_an_ordered_set() {
        let mut doc = EntityDocument::new(resolve_entity("tu.edu.np"));
        doc.add_file("b.txt");
        doc.add_file("a.txt");
        doc.add_file("b.txt");
        assert_eq!(doc.files, vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn test_blob_serializes_with_original_field_names() {
        let blob = TextBlob::new("docs/x.pdf", BlobKind::PdfExtracted, "unknown", "text", None);
        let json = serde_json::to_value(&blob).unwrap();
        assert_eq!(json["kind"], "pdf");
        assert_eq!(json["text_norm"], "text");
        assert!(json["text_en"].is_null());
    }
}
