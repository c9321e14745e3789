//! Document list with upload form

use chrono::{DateTime, Local, Utc};
use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::app::DocsmithApp;
use crate::core::document::DocumentType;

fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Documents page
pub struct DocumentsPanel;

impl DocumentsPanel {
    pub fn show(ui: &mut egui::Ui, app: &mut DocsmithApp) {
        ui.horizontal(|ui| {
            ui.heading("My Documents");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if app.upload_form.visible {
                    "Cancel Upload"
                } else {
                    "Upload File"
                };
                if ui.button(label).clicked() {
                    app.upload_form.visible = !app.upload_form.visible;
                }
                if ui.button("New Document").clicked() {
                    app.start_create(DocumentType::Pdf);
                }
            });
        });

        ui.separator();

        if app.upload_form.visible {
            Self::show_upload_form(ui, app);
            ui.separator();
        }

        if app.documents.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label("No documents yet. Create or upload one to get started.");
            });
            return;
        }

        Self::show_table(ui, app);
    }

    fn show_upload_form(ui: &mut egui::Ui, app: &mut DocsmithApp) {
        ui.horizontal(|ui| {
            ui.label("Type:");
            egui::ComboBox::from_id_salt("upload_type")
                .selected_text(app.upload_form.doc_type.label())
                .show_ui(ui, |ui| {
                    for doc_type in DocumentType::ALL {
                        ui.selectable_value(&mut app.upload_form.doc_type, doc_type, doc_type.label());
                    }
                });

            if ui.button("Choose file...").clicked() {
                app.pick_upload_file();
            }

            let selected = app
                .upload_form
                .file
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "No file selected".to_string());
            ui.label(selected);

            let label = if app.uploading { "Uploading..." } else { "Upload" };
            if ui
                .add_enabled(!app.uploading, egui::Button::new(label))
                .clicked()
            {
                app.start_upload();
            }
        });
    }

    fn show_table(ui: &mut egui::Ui, app: &mut DocsmithApp) {
        let rows: Vec<_> = app
            .documents
            .iter()
            .map(|d| {
                (
                    d.id.clone(),
                    format!("{} {}", d.doc_type.icon(), d.name),
                    d.doc_type.to_string().to_uppercase(),
                    format_date(&d.created_at),
                    format_date(&d.updated_at),
                )
            })
            .collect();

        let mut open = None;
        let mut delete = None;

        TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder().at_least(160.0))
            .column(Column::auto().at_least(50.0))
            .columns(Column::auto().at_least(120.0), 2)
            .column(Column::auto())
            .header(20.0, |mut header| {
                for title in ["Name", "Type", "Created", "Updated", ""] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (id, name, doc_type, created, updated) in &rows {
                    body.row(22.0, |mut row| {
                        row.col(|ui| {
                            if ui.link(name).clicked() {
                                open = Some(id.clone());
                            }
                        });
                        row.col(|ui| {
                            ui.label(doc_type);
                        });
                        row.col(|ui| {
                            ui.label(created);
                        });
                        row.col(|ui| {
                            ui.label(updated);
                        });
                        row.col(|ui| {
                            if ui.small_button("Edit").clicked() {
                                open = Some(id.clone());
                            }
                            if ui.small_button("Delete").clicked() {
                                delete = Some(id.clone());
                            }
                        });
                    });
                }
            });

        if let Some(id) = open {
            app.open_document(&id);
        }
        if let Some(id) = delete {
            app.request_delete(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date_has_minutes() {
        let date = Utc.with_ymd_and_hms(2025, 1, 14, 10, 0, 0).unwrap();
        let formatted = format_date(&date);
        assert_eq!(formatted.len(), "2025-01-14 10:00".len());
        assert!(formatted.ends_with(":00"));
    }
}
