//! Sidebar listing recent and all documents

use eframe::egui;

use crate::app::{DocsmithApp, Route};

/// Sidebar with quick document navigation
pub struct Sidebar;

impl Sidebar {
    /// Show the sidebar
    pub fn show(ui: &mut egui::Ui, app: &mut DocsmithApp) {
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.heading("Library");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("+").on_hover_text("New document").clicked() {
                        app.start_create(Default::default());
                    }
                });
            });

            ui.separator();

            let active = match &app.route {
                Route::Editor(id) => Some(id.clone()),
                _ => None,
            };

            // Deleted documents are skipped
            let recent: Vec<(String, String)> = app
                .config
                .recent_documents
                .iter()
                .filter_map(|id| {
                    app.documents
                        .iter()
                        .find(|d| &d.id == id)
                        .map(|d| (d.id.clone(), d.name.clone()))
                })
                .collect();

            if !recent.is_empty() {
                ui.collapsing("Recent", |ui| {
                    for (id, name) in &recent {
                        let is_active = active.as_deref() == Some(id.as_str());
                        if ui.selectable_label(is_active, name).clicked() {
                            app.open_document(id);
                        }
                    }
                });
            }

            egui::ScrollArea::vertical()
                .id_salt("sidebar_scroll")
                .show(ui, |ui| {
                    let entries: Vec<_> = app
                        .documents
                        .iter()
                        .map(|d| (d.id.clone(), format!("{} {}", d.doc_type.icon(), d.name)))
                        .collect();

                    for (id, label) in entries {
                        let is_active = active.as_deref() == Some(id.as_str());
                        let modified = is_active && app.editor.as_ref().is_some_and(|e| e.dirty);
                        let label = if modified { format!("{label}*") } else { label };
                        if ui.selectable_label(is_active, label).clicked() {
                            app.open_document(&id);
                        }
                    }
                });
        });
    }
}
