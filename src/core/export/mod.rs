//! Export pipeline: document content to a downloadable file
//!
//! `render` turns content into an in-memory [`ExportedFile`]; `export_to`
//! additionally writes it to disk on the blocking pool and collapses every
//! failure into [`ExportFailed`].

pub mod delivery;
pub mod docx;
pub mod markup;
pub mod pdf;
pub mod text;

use std::fmt;
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use super::document::{strip_known_extension, DocumentType};

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Text,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Pdf,
        ExportFormat::Docx,
        ExportFormat::Text,
        ExportFormat::Markdown,
    ];

    /// Format used by the editor's download action
    pub fn for_document_type(doc_type: DocumentType) -> Self {
        match doc_type {
            DocumentType::Pdf => ExportFormat::Pdf,
            DocumentType::Doc | DocumentType::Ppt => ExportFormat::Docx,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Text => "text/plain",
            ExportFormat::Markdown => "text/markdown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "Word document",
            ExportFormat::Text => "text file",
            ExportFormat::Markdown => "Markdown file",
        }
    }

    /// File name for an export of a document called `title`
    pub fn file_name(self, title: &str) -> String {
        let base: String = title
            .trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        let base = if base.is_empty() { "document" } else { &base };
        format!("{}.{}", base, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Re-export of a document through the other exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    PdfToWord,
    WordToPdf,
}

impl Conversion {
    pub fn target_format(self) -> ExportFormat {
        match self {
            Conversion::PdfToWord => ExportFormat::Docx,
            Conversion::WordToPdf => ExportFormat::Pdf,
        }
    }

    /// Title for the converted file, without the source extension
    pub fn file_title(self, name: &str) -> String {
        let suffix = match self {
            Conversion::PdfToWord => ".pdf",
            Conversion::WordToPdf => ".docx",
        };
        name.strip_suffix(suffix).unwrap_or(name).to_string()
    }

    pub fn label(self) -> &'static str {
        match self {
            Conversion::PdfToWord => "PDF to Word",
            Conversion::WordToPdf => "Word to PDF",
        }
    }
}

/// Input to every exporter
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub generated_at: NaiveDateTime,
}

impl ExportRequest<'_> {
    pub fn footer(&self) -> String {
        format!("Generated on: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// A complete export held in memory
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Detailed export failure, for the log
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("DOCX generation failed: {0}")]
    Docx(String),
    #[error("failed to write export: {0}")]
    Write(#[from] std::io::Error),
    #[error("export task failed: {0}")]
    Task(String),
}

/// Failure reported to the user
#[derive(Debug, Error)]
#[error("Failed to export {format}")]
pub struct ExportFailed {
    pub format: ExportFormat,
}

/// Render `request` as `format`
pub fn render(format: ExportFormat, request: &ExportRequest<'_>) -> Result<ExportedFile, ExportError> {
    let bytes = match format {
        ExportFormat::Pdf => {
            let setup = pdf::PageSetup::default();
            let plain = markup::strip_markup(request.content);
            let pages = pdf::layout(request.title, &plain, &request.footer(), &setup);
            pdf::render_pdf(&pages, &setup, request.title)?
        }
        ExportFormat::Docx => {
            let plain = markup::strip_markup(request.content);
            let paragraphs = docx::build_paragraphs(request.title, &plain, &request.footer());
            docx::render_docx(&paragraphs)?
        }
        ExportFormat::Text => text::render_text(request).into_bytes(),
        ExportFormat::Markdown => text::render_markdown(request).into_bytes(),
    };

    Ok(ExportedFile {
        file_name: format.file_name(&strip_known_extension(request.title)),
        mime_type: format.mime_type(),
        bytes,
    })
}

/// Render and write an export to `target`, off the calling thread
pub async fn export_to(
    format: ExportFormat,
    title: String,
    content: String,
    target: PathBuf,
) -> Result<PathBuf, ExportFailed> {
    let generated_at = Local::now().naive_local();

    let result = tokio::task::spawn_blocking(move || {
        let request = ExportRequest {
            title: &title,
            content: &content,
            generated_at,
        };
        let file = render(format, &request)?;
        delivery::write_atomic(&target, &file.bytes)?;
        tracing::info!(
            "Exported {} ({}, {} bytes) to {}",
            file.file_name,
            file.mime_type,
            file.bytes.len(),
            target.display()
        );
        Ok::<_, ExportError>(target)
    })
    .await
    .unwrap_or_else(|e| Err(ExportError::Task(e.to_string())));

    result.map_err(|e| {
        tracing::error!("Error exporting {}: {}", format, e);
        ExportFailed { format }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request<'a>(title: &'a str, content: &'a str) -> ExportRequest<'a> {
        ExportRequest {
            title,
            content,
            generated_at: NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_format_for_document_type() {
        assert_eq!(ExportFormat::for_document_type(DocumentType::Pdf), ExportFormat::Pdf);
        assert_eq!(ExportFormat::for_document_type(DocumentType::Doc), ExportFormat::Docx);
        assert_eq!(ExportFormat::for_document_type(DocumentType::Ppt), ExportFormat::Docx);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ExportFormat::Pdf.file_name("Report"), "Report.pdf");
        assert_eq!(ExportFormat::Markdown.file_name("a/b"), "a_b.md");
        assert_eq!(ExportFormat::Text.file_name("  "), "document.txt");
    }

    #[test]
    fn test_conversion_titles() {
        assert_eq!(Conversion::PdfToWord.file_title("scan.pdf"), "scan");
        assert_eq!(Conversion::WordToPdf.file_title("letter.docx"), "letter");
        assert_eq!(Conversion::WordToPdf.file_title("letter"), "letter");
        assert_eq!(Conversion::PdfToWord.target_format(), ExportFormat::Docx);
    }

    #[test]
    fn test_render_every_format() {
        let req = request("Report.docx", "<p>Hello</p>World");
        for format in ExportFormat::ALL {
            let file = render(format, &req).unwrap();
            assert_eq!(file.file_name, format!("Report.{}", format.extension()));
            assert_eq!(file.mime_type, format.mime_type());
            assert!(!file.bytes.is_empty());
        }
    }

    #[test]
    fn test_render_text_content() {
        let file = render(ExportFormat::Text, &request("Notes", "Hello<br>World")).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        assert!(text.starts_with("Notes\n\nHello\nWorld"));
        assert!(text.trim_end().ends_with("Generated on: 2025-01-15 09:15:00"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_export_to_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.md");

        let written = export_to(
            ExportFormat::Markdown,
            "Notes".to_string(),
            "body".to_string(),
            target.clone(),
        )
        .await
        .unwrap();

        assert_eq!(written, target);
        let text = std::fs::read_to_string(&target).unwrap();
        assert!(text.starts_with("# Notes\n\nbody"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_export_to_unwritable_target_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.txt");

        let err = export_to(
            ExportFormat::Text,
            "Notes".to_string(),
            "body".to_string(),
            target.clone(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.format, ExportFormat::Text);
        assert_eq!(err.to_string(), "Failed to export text file");
        assert!(!target.exists());
    }
}
