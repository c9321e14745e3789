//! Top menu bar with navigation, create and convert menus

use eframe::egui;

use crate::app::{DocsmithApp, Route};
use crate::core::document::DocumentType;
use crate::core::export::Conversion;

/// Application header
pub struct Header;

impl Header {
    /// Render the top menu bar
    pub fn show(ctx: &egui::Context, app: &mut DocsmithApp) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Home").clicked() {
                        app.route = Route::Home;
                        ui.close();
                    }
                    if ui.button("Documents").clicked() {
                        app.route = Route::Documents;
                        ui.close();
                    }
                    ui.separator();
                    let has_editor = app.editor.is_some();
                    if ui.add_enabled(has_editor, egui::Button::new("Save")).clicked() {
                        app.save_active_document();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Create", |ui| {
                    for doc_type in DocumentType::ALL {
                        let label = format!("{} New {}", doc_type.icon(), doc_type.label());
                        if ui.button(label).clicked() {
                            app.start_create(doc_type);
                            ui.close();
                        }
                    }
                });

                ui.menu_button("Convert", |ui| {
                    let enabled = app.editor.is_some() && !app.exporting;
                    for conversion in [Conversion::PdfToWord, Conversion::WordToPdf] {
                        if ui
                            .add_enabled(enabled, egui::Button::new(conversion.label()))
                            .on_disabled_hover_text("Open a document first")
                            .clicked()
                        {
                            app.convert_active_document(conversion);
                            ui.close();
                        }
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Toggle Sidebar").clicked() {
                        app.sidebar_visible = !app.sidebar_visible;
                        ui.close();
                    }
                    if ui
                        .checkbox(&mut app.config.editor.show_preview, "Show Preview")
                        .clicked()
                    {
                        ui.close();
                    }
                    ui.separator();
                    let dark = app.config.ui.theme != "light";
                    if ui.selectable_label(dark, "Dark Theme").clicked() {
                        app.set_theme("dark");
                        ui.close();
                    }
                    if ui.selectable_label(!dark, "Light Theme").clicked() {
                        app.set_theme("light");
                        ui.close();
                    }
                });
            });
        });
    }
}
