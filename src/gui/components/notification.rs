//! Floating notification in the top-right corner

use eframe::egui;

use crate::gui::constants::*;
use crate::notify::{NotificationKind, Notifier};
use crate::panel::Action;

fn kind_color(kind: NotificationKind) -> egui::Color32 {
    match kind {
        NotificationKind::Success => NOTIFY_SUCCESS,
        NotificationKind::Error => NOTIFY_ERROR,
        NotificationKind::Info => NOTIFY_INFO,
        NotificationKind::Plain => NOTIFY_PLAIN,
    }
}

/// Renders the current message, returns `DismissNotification` when closed
pub fn show(ctx: &egui::Context, notifier: &Notifier) -> Option<Action> {
    let notification = notifier.visible()?;
    let mut action = None;

    egui::Area::new(egui::Id::new("notification"))
        .anchor(egui::Align2::RIGHT_TOP, [-PADDING, PADDING + 30.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .fill(kind_color(notification.kind))
                .inner_margin(ITEM_SPACING)
                .show(ui, |ui| {
                    ui.set_max_width(NOTIFY_WIDTH);
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(&notification.message).color(egui::Color32::WHITE),
                        );
                        if ui
                            .small_button(egui::RichText::new("✖").color(egui::Color32::WHITE))
                            .on_hover_text("Dismiss")
                            .clicked()
                        {
                            action = Some(Action::DismissNotification);
                        }
                    });
                });
        });

    action
}
