//! GUI-specific constants for layout, notification colors and sizes

use egui;

pub const WINDOW_MIN_WIDTH: f32 = 640.0;
pub const WINDOW_MIN_HEIGHT: f32 = 520.0;

/// Layout spacing
pub const PADDING: f32 = 10.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Gallery cells
pub const THUMBNAIL_SIZE: f32 = 120.0;
pub const PREVIEW_MAX_HEIGHT: f32 = 240.0;

/// Form label column
pub const LABEL_WIDTH: f32 = 80.0;

/// Notification colors
pub const NOTIFY_SUCCESS: egui::Color32 = egui::Color32::from_rgb(0, 160, 60);
pub const NOTIFY_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 40, 40);
pub const NOTIFY_INFO: egui::Color32 = egui::Color32::from_rgb(30, 110, 200);
pub const NOTIFY_PLAIN: egui::Color32 = egui::Color32::from_rgb(70, 70, 70);
pub const NOTIFY_WIDTH: f32 = 320.0;
