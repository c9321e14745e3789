//! Landing page

use eframe::egui;

use crate::app::{DocsmithApp, Route};
use crate::core::document::DocumentType;

const FEATURES: [(&str, &str, &str); 4] = [
    (
        "\u{1F4C4}",
        "Create Documents",
        "Create PDF, Word and presentation documents",
    ),
    (
        "\u{270F}",
        "Edit & Manage",
        "Edit your documents with a clean, simple editor",
    ),
    (
        "\u{1F4BE}",
        "Save Locally",
        "All documents are stored on this computer",
    ),
    (
        "\u{1F4E5}",
        "Export Anywhere",
        "Export as PDF, Word, plain text or Markdown",
    ),
];

/// Home page
pub struct HomePanel;

impl HomePanel {
    pub fn show(ui: &mut egui::Ui, app: &mut DocsmithApp) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading("Welcome to Docsmith");
            ui.add_space(10.0);
            ui.label(format!("{} documents in your library", app.documents.len()));
            ui.add_space(20.0);

            ui.horizontal(|ui| {
                if ui.button("Create Document").clicked() {
                    app.start_create(DocumentType::Pdf);
                }
                if ui.button("View Documents").clicked() {
                    app.route = Route::Documents;
                }
            });

            ui.add_space(30.0);
            for (icon, title, description) in FEATURES {
                ui.label(egui::RichText::new(format!("{icon} {title}")).strong());
                ui.label(description);
                ui.add_space(8.0);
            }

            ui.add_space(20.0);
            ui.label("Keyboard shortcuts:");
            ui.label("  Ctrl+N - New document");
            ui.label("  Ctrl+S - Save");
            ui.label("  Ctrl+E - Download");
            ui.label("  Ctrl+B - Toggle sidebar");
        });
    }
}
