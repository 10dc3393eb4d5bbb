//! Thumbnail grid of project images

use eframe::egui;

use crate::gui::constants::*;
use crate::panel::{Action, GalleryState};

pub fn ui(ui: &mut egui::Ui, gallery: &GalleryState, selected: Option<usize>) -> Option<Action> {
    let mut action = None;

    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Project Images").strong());
            if ui.button("🔄 Refresh").clicked() {
                action = Some(Action::LoadImages);
            }
        });
        ui.add_space(ITEM_SPACING);

        match gallery {
            GalleryState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading images...");
                });
            }
            GalleryState::Empty => {
                ui.label("No images found");
            }
            GalleryState::Failed(e) => {
                ui.colored_label(NOTIFY_ERROR, format!("Failed to load images: {e}"));
            }
            GalleryState::Ready(images) => {
                egui::ScrollArea::horizontal()
                    .id_salt("gallery_scroll")
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            for (idx, image) in images.iter().enumerate() {
                                ui.vertical(|ui| {
                                    ui.set_width(THUMBNAIL_SIZE);
                                    let thumbnail = egui::Image::new(image.display_path.as_str())
                                        .fit_to_exact_size(egui::vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE));
                                    let response = ui
                                        .add(egui::Button::image(thumbnail).selected(selected == Some(idx)))
                                        .on_hover_text(&image.backend_path);
                                    if response.clicked() {
                                        action = Some(Action::SelectImage(idx));
                                    }

                                    ui.horizontal(|ui| {
                                        ui.add(egui::Label::new(image.file_name()).truncate());
                                        if ui.small_button("🗑").on_hover_text("Delete image").clicked() {
                                            action = Some(Action::DeleteImage(idx));
                                        }
                                    });
                                });
                            }
                        });
                    });
            }
        }
    });

    action
}
