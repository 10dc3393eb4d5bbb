//! Test Print tab: gallery, print form and result

use eframe::egui;

use super::gallery;
use crate::gui::constants::*;
use crate::panel::{Action, PrintTab};

fn form_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.add_sized([LABEL_WIDTH, 0.0], egui::Label::new(label));
    ui.add(egui::TextEdit::singleline(value).desired_width(f32::INFINITY));
    ui.end_row();
}

pub fn ui(ui: &mut egui::Ui, view: PrintTab<'_>) -> Option<Action> {
    let PrintTab {
        form,
        gallery: gallery_state,
        selected,
        preview_uri,
        open_target,
        payload,
        result,
        busy,
    } = view;

    let mut action = gallery::ui(ui, gallery_state, selected);
    ui.add_space(SECTION_SPACING);

    ui.columns(2, |columns| {
        columns[0].group(|ui| {
            ui.label(egui::RichText::new("Print Job").strong());
            ui.add_space(ITEM_SPACING);

            egui::Grid::new("print_form")
                .num_columns(2)
                .spacing([ITEM_SPACING, ITEM_SPACING])
                .show(ui, |ui| {
                    form_row(ui, "File:", &mut form.file_path);
                    form_row(ui, "Task ID:", &mut form.taskid);
                    form_row(ui, "Width:", &mut form.width);
                    form_row(ui, "Height:", &mut form.height);
                    form_row(ui, "Left:", &mut form.left);
                    form_row(ui, "Top:", &mut form.top);
                    form_row(ui, "Endpoint:", &mut form.endpoint);
                });

            ui.add_space(ITEM_SPACING);
            ui.horizontal(|ui| {
                let label = if busy { "Sending..." } else { "🖨 Print" };
                if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
                    action = Some(Action::SendPrint);
                }
                if let Some(target) = open_target
                    && ui.button("📂 Open File").on_hover_text(target).clicked()
                {
                    action = Some(Action::OpenFile);
                }
            });
            if form.taskid.trim().is_empty() {
                ui.weak("An empty task ID is generated from the current time");
            }
        });

        columns[1].group(|ui| {
            ui.label(egui::RichText::new("Preview").strong());
            ui.add_space(ITEM_SPACING);
            match preview_uri {
                Some(uri) => {
                    ui.add(
                        egui::Image::new(uri)
                            .max_height(PREVIEW_MAX_HEIGHT)
                            .maintain_aspect_ratio(true),
                    );
                }
                None => {
                    ui.weak("Select an image above");
                }
            }
        });
    });

    ui.add_space(SECTION_SPACING);
    readonly_block(ui, "Request", "print_payload", payload);
    ui.add_space(ITEM_SPACING);
    readonly_block(ui, "Result", "print_result", result);

    action
}

/// Monospace text area that can be selected but not edited
pub fn readonly_block(ui: &mut egui::Ui, title: &str, id: &str, text: &str) {
    ui.group(|ui| {
        ui.label(egui::RichText::new(title).strong());
        let mut text = text;
        ui.add(
            egui::TextEdit::multiline(&mut text)
                .id_salt(id)
                .code_editor()
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
    });
}
