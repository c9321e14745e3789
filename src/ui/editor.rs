//! Document editor panel

use eframe::egui;

use crate::app::{DocsmithApp, Route};
use crate::core::export::ExportFormat;

use super::preview::PreviewPanel;

/// Editor page for a single document
pub struct EditorPanel;

impl EditorPanel {
    /// Show the editor for document `id`
    pub fn show(ui: &mut egui::Ui, app: &mut DocsmithApp, id: &str) {
        if app.editor.as_ref().map(|e| e.id.as_str()) != Some(id) {
            Self::show_not_found(ui, app);
            return;
        }

        Self::show_toolbar(ui, app);
        ui.separator();

        if app.config.editor.show_preview {
            let available_width = ui.available_width();
            ui.horizontal_top(|ui| {
                ui.set_min_width(available_width);

                ui.vertical(|ui| {
                    ui.set_width(available_width / 2.0 - 4.0);
                    Self::show_text(ui, app);
                });

                ui.separator();

                ui.vertical(|ui| {
                    ui.set_width(available_width / 2.0 - 4.0);
                    PreviewPanel::show(ui, app);
                });
            });
        } else {
            Self::show_text(ui, app);
        }
    }

    fn show_toolbar(ui: &mut egui::Ui, app: &mut DocsmithApp) {
        let busy = app.exporting;

        ui.horizontal(|ui| {
            if ui.button("\u{2190} Back").clicked() {
                app.route = Route::Documents;
            }

            let Some(editor) = app.editor.as_mut() else {
                return;
            };
            ui.label(editor.doc_type.icon());
            let name = ui.add(egui::TextEdit::singleline(&mut editor.name).desired_width(260.0));
            if name.changed() {
                editor.dirty = true;
            }
            if editor.dirty {
                ui.label("*").on_hover_text("Unsaved changes");
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_enabled_ui(!busy, |ui| {
                    ui.menu_button("Export as", |ui| {
                        for format in ExportFormat::ALL {
                            if ui.button(format.label()).clicked() {
                                app.export_active_document(format);
                                ui.close();
                            }
                        }
                    });

                    let label = if busy { "Exporting..." } else { "Download" };
                    if ui.button(label).clicked() {
                        app.download_active_document();
                    }
                });

                if ui.button("Save").clicked() {
                    app.save_active_document();
                }
            });
        });
    }

    fn show_text(ui: &mut egui::Ui, app: &mut DocsmithApp) {
        let font_size = app.config.editor.font_size;
        let word_wrap = app.config.editor.word_wrap;
        let Some(editor) = app.editor.as_mut() else {
            return;
        };

        egui::ScrollArea::both()
            .id_salt("editor_scroll")
            .show(ui, |ui| {
                let width = if word_wrap {
                    ui.available_width()
                } else {
                    f32::INFINITY
                };
                let response = egui::TextEdit::multiline(&mut editor.content)
                    .font(egui::FontId::monospace(font_size))
                    .hint_text("Start writing your document...")
                    .desired_width(width)
                    .desired_rows(30)
                    .show(ui);

                if response.response.changed() {
                    editor.dirty = true;
                }
            });
    }

    fn show_not_found(ui: &mut egui::Ui, app: &mut DocsmithApp) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading("Document not found");
            ui.add_space(10.0);
            if ui.button("Back to documents").clicked() {
                app.route = Route::Documents;
            }
        });
    }
}
