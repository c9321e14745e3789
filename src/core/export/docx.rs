//! Word (.docx) export

use std::io::Cursor;

use docx_rs::{Docx, LineSpacing, Paragraph, Run};

use super::ExportError;

/// Role of a paragraph in the exported document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    Title,
    Body,
    /// Empty paragraph keeping the spacing of a blank source line
    Spacer,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxParagraph {
    pub kind: ParagraphKind,
    pub text: String,
}

impl DocxParagraph {
    fn new(kind: ParagraphKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Paragraph sequence for plain `text`
pub fn build_paragraphs(title: &str, text: &str, footer: &str) -> Vec<DocxParagraph> {
    let mut paragraphs = vec![DocxParagraph::new(ParagraphKind::Title, title)];

    for line in text.lines() {
        if line.trim().is_empty() {
            paragraphs.push(DocxParagraph::new(ParagraphKind::Spacer, ""));
        } else {
            paragraphs.push(DocxParagraph::new(ParagraphKind::Body, line));
        }
    }

    paragraphs.push(DocxParagraph::new(ParagraphKind::Footer, footer));
    paragraphs
}

fn to_docx_paragraph(paragraph: &DocxParagraph) -> Paragraph {
    // Spacing is in twentieths of a point, run size in half points
    match paragraph.kind {
        ParagraphKind::Title => Paragraph::new()
            .add_run(Run::new().add_text(&paragraph.text).bold().size(32))
            .line_spacing(LineSpacing::new().after(300)),
        ParagraphKind::Body => Paragraph::new()
            .add_run(Run::new().add_text(&paragraph.text))
            .line_spacing(LineSpacing::new().after(200)),
        ParagraphKind::Spacer => Paragraph::new().line_spacing(LineSpacing::new().after(100)),
        ParagraphKind::Footer => Paragraph::new()
            .add_run(
                Run::new()
                    .add_text(&paragraph.text)
                    .italic()
                    .color("808080"),
            )
            .line_spacing(LineSpacing::new().before(400)),
    }
}

/// Pack paragraphs into a .docx container
pub fn render_docx(paragraphs: &[DocxParagraph]) -> Result<Vec<u8>, ExportError> {
    let docx = paragraphs
        .iter()
        .fold(Docx::new(), |docx, p| docx.add_paragraph(to_docx_paragraph(p)));

    let mut buf = Vec::new();
    docx.build()
        .pack(Cursor::new(&mut buf))
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(buf)
}
