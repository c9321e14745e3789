//! Text layout PDF export
//!
//! Markup is discarded. Each source line is word-wrapped to a fixed character
//! budget and drawn as plain text onto fixed size pages. Every page carries
//! the title at the top and the generated-on footer at the bottom.

use printpdf::{
    BuiltinFont, Color, Greyscale, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Pt,
};

use super::ExportError;

/// Page geometry in PDF points
#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub title_size: f32,
    /// Space between the title baseline and the first body line
    pub title_gap: f32,
    pub footer_size: f32,
    /// Baseline of the footer, measured from the page bottom
    pub footer_y: f32,
    /// Maximum characters per wrapped line
    pub chars_per_line: usize,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin_top: 50.0,
            margin_bottom: 50.0,
            margin_left: 50.0,
            font_size: 11.0,
            line_height: 14.0,
            title_size: 16.0,
            title_gap: 24.0,
            footer_size: 9.0,
            footer_y: 25.0,
            chars_per_line: 90,
        }
    }
}

impl PageSetup {
    fn title_y(&self) -> f32 {
        self.height - self.margin_top
    }

    fn first_line_y(&self) -> f32 {
        self.title_y() - self.title_gap
    }
}

/// A line of text placed at a baseline (points from the page bottom)
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub y: f32,
}

/// Everything drawn on one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub title: String,
    pub lines: Vec<PlacedLine>,
    pub footer: String,
}

/// Greedily pack the words of `line` into lines of at most `budget` chars.
///
/// A single word longer than the budget is kept whole on its own line. A
/// blank line yields one empty line.
pub fn wrap_line(line: &str, budget: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        if current.chars().count() + 1 + word.chars().count() > budget {
            wrapped.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }

    if !current.is_empty() || wrapped.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

/// Distribute `text` over pages
pub fn layout(title: &str, text: &str, footer: &str, setup: &PageSetup) -> Vec<PageLayout> {
    let new_page = || PageLayout {
        title: title.to_string(),
        lines: Vec::new(),
        footer: footer.to_string(),
    };

    let mut pages = vec![new_page()];
    let mut y = setup.first_line_y();

    for source_line in text.lines() {
        for wrapped in wrap_line(source_line, setup.chars_per_line) {
            if y < setup.margin_bottom {
                pages.push(new_page());
                y = setup.first_line_y();
            }
            if let Some(page) = pages.last_mut() {
                page.lines.push(PlacedLine { text: wrapped, y });
            }
            y -= setup.line_height;
        }
    }

    pages
}

fn pdf_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

struct Fonts {
    title: IndirectFontRef,
    body: IndirectFontRef,
    footer: IndirectFontRef,
}

fn draw_page(layer: &PdfLayerReference, page: &PageLayout, setup: &PageSetup, fonts: &Fonts) {
    let x = Mm::from(Pt(setup.margin_left));
    let at = |y: f32| Mm::from(Pt(y));

    layer.set_fill_color(Color::Greyscale(Greyscale::new(0.0, None)));
    layer.use_text(
        page.title.clone(),
        setup.title_size,
        x,
        at(setup.title_y()),
        &fonts.title,
    );

    for line in &page.lines {
        if !line.text.is_empty() {
            layer.use_text(line.text.clone(), setup.font_size, x, at(line.y), &fonts.body);
        }
    }

    layer.set_fill_color(Color::Greyscale(Greyscale::new(0.5, None)));
    layer.use_text(
        page.footer.clone(),
        setup.footer_size,
        x,
        at(setup.footer_y),
        &fonts.footer,
    );
}

/// Serialize laid out pages into PDF bytes
pub fn render_pdf(
    pages: &[PageLayout],
    setup: &PageSetup,
    doc_title: &str,
) -> Result<Vec<u8>, ExportError> {
    let width = Mm::from(Pt(setup.width));
    let height = Mm::from(Pt(setup.height));

    let (doc, first_page, first_layer) = PdfDocument::new(doc_title, width, height, "Layer 1");
    let fonts = Fonts {
        title: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?,
        body: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        footer: doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_err)?,
    };

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(width, height, "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, setup, &fonts);
    }

    doc.save_to_bytes().map_err(pdf_err)
}
