//! Document records and partial updates

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Advisory document kind; selects the export path, nothing else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Pdf,
    Doc,
    Ppt,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [DocumentType::Pdf, DocumentType::Doc, DocumentType::Ppt];

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            DocumentType::Pdf => "PDF Document",
            DocumentType::Doc => "Word Document",
            DocumentType::Ppt => "PowerPoint Presentation",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            DocumentType::Pdf => "\u{1F4C4}",
            DocumentType::Doc => "\u{1F4CB}",
            DocumentType::Ppt => "\u{1F4CA}",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Doc => "doc",
            DocumentType::Ppt => "ppt",
        };
        f.write_str(tag)
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique, immutable identifier
    pub id: String,
    /// Display title
    pub name: String,
    /// Document kind
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Rich text / markup body
    #[serde(default)]
    pub content: String,
    /// Creation time, never changes
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Body used when a new document is created without content
    pub fn starter_content(title: &str) -> String {
        format!("# {title}\n\nStart typing here...")
    }
}

/// Strip `.pdf`, `.doc(x)` or `.ppt(x)` from the end of a file name
pub fn strip_known_extension(name: &str) -> String {
    static EXTENSION: OnceLock<Option<Regex>> = OnceLock::new();
    match EXTENSION
        .get_or_init(|| Regex::new(r"(?i)\.(pdf|docx?|pptx?)$").ok())
        .as_ref()
    {
        Some(re) => re.replace(name, "").into_owned(),
        None => name.to_string(),
    }
}

/// Partial set of fields used by create and update.
///
/// There is no field for `id` or `created_at`; both always come from the original.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub doc_type: Option<DocumentType>,
    pub content: Option<String>,
}

impl DocumentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn doc_type(mut self, doc_type: DocumentType) -> Self {
        self.doc_type = Some(doc_type);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Merge this patch over `original`, stamping `updated_at` with `now`
    pub fn apply(&self, original: &Document, now: DateTime<Utc>) -> Document {
        Document {
            id: original.id.clone(),
            name: self.name.clone().unwrap_or_else(|| original.name.clone()),
            doc_type: self.doc_type.unwrap_or(original.doc_type),
            content: self
                .content
                .clone()
                .unwrap_or_else(|| original.content.clone()),
            created_at: original.created_at,
            updated_at: now,
        }
    }
}

fn seed_time(month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, hour, min, 0)
        .single()
        .unwrap_or_default()
}

/// Built-in collection used when the durable slot is missing or corrupt
pub fn seed_documents() -> Vec<Document> {
    vec![
        Document {
            id: "1".to_string(),
            name: "Sample PDF Document".to_string(),
            doc_type: DocumentType::Pdf,
            content: "This is a sample PDF document for testing.".to_string(),
            created_at: seed_time(1, 14, 10, 0),
            updated_at: seed_time(1, 15, 9, 15),
        },
        Document {
            id: "2".to_string(),
            name: "Sample Word Document".to_string(),
            doc_type: DocumentType::Doc,
            content: "This is a sample Word document for testing.".to_string(),
            created_at: seed_time(1, 14, 14, 30),
            updated_at: seed_time(1, 15, 9, 15),
        },
    ]
}
