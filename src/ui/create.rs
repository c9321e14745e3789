//! New document form

use eframe::egui;

use crate::app::{CreateForm, DocsmithApp, Route};
use crate::core::document::DocumentType;

/// Create page
pub struct CreatePanel;

impl CreatePanel {
    pub fn show(ui: &mut egui::Ui, app: &mut DocsmithApp) {
        ui.heading("Create New Document");
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            for doc_type in DocumentType::ALL {
                let selected = app.create_form.doc_type == doc_type;
                let label = format!("{} {}", doc_type.icon(), doc_type.label());
                if ui.selectable_label(selected, label).clicked() && !selected {
                    let content = std::mem::take(&mut app.create_form.content);
                    app.create_form = CreateForm {
                        content,
                        ..CreateForm::for_type(doc_type)
                    };
                }
            }
        });

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.label("Title:");
            ui.add(
                egui::TextEdit::singleline(&mut app.create_form.title)
                    .desired_width(f32::INFINITY),
            );
        });

        ui.add_space(6.0);
        ui.label("Content (optional):");
        egui::ScrollArea::vertical()
            .id_salt("create_scroll")
            .max_height(ui.available_height() - 40.0)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut app.create_form.content)
                        .hint_text("Start writing your document...")
                        .desired_width(f32::INFINITY)
                        .desired_rows(16),
                );
            });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Back").clicked() {
                app.route = Route::Home;
            }
            let can_create = !app.create_form.title.trim().is_empty();
            if ui
                .add_enabled(can_create, egui::Button::new("Create Document"))
                .clicked()
            {
                app.create_document();
            }
        });
    }
}
