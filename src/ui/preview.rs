//! Rendered preview of the document being edited

use eframe::egui;
use egui_commonmark::CommonMarkViewer;

use crate::app::DocsmithApp;

/// Markdown preview panel
pub struct PreviewPanel;

impl PreviewPanel {
    /// Show the preview panel
    pub fn show(ui: &mut egui::Ui, app: &mut DocsmithApp) {
        // Get content first to avoid borrow conflicts
        let content = app.editor.as_ref().map(|e| e.content.clone());

        egui::ScrollArea::vertical()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                if let Some(content) = content {
                    CommonMarkViewer::new().show(ui, &mut app.commonmark_cache, &content);
                } else {
                    ui.label("No document selected");
                }
            });
    }
}
