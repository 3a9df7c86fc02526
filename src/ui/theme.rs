// GroupScout - ui/theme.rs
//
// Colour scheme, notification colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::NotificationLevel;
use egui::Color32;

/// Apply the configured light or dark visuals.
pub fn apply(ctx: &egui::Context, dark_mode: bool) {
    if dark_mode {
        ctx.set_visuals(egui::Visuals::dark());
    } else {
        ctx.set_visuals(egui::Visuals::light());
    }
}

/// Accent colour for a notification level.
pub fn notification_colour(level: NotificationLevel) -> Color32 {
    match level {
        NotificationLevel::Error => Color32::from_rgb(220, 38, 38),  // Red 600
        NotificationLevel::Warning => Color32::from_rgb(217, 119, 6), // Amber 600
        NotificationLevel::Info => Color32::from_rgb(37, 99, 235),    // Blue 600
    }
}

/// Chip fill for a selected log group.
pub const CHIP_BG: Color32 = Color32::from_rgb(55, 65, 81); // Gray 700
pub const CHIP_TEXT: Color32 = Color32::from_rgb(229, 231, 235); // Gray 200

/// Template variables are highlighted so they read as placeholders.
pub const TEMPLATE_VARIABLE_TEXT: Color32 = Color32::from_rgb(167, 139, 250); // Violet 400

/// Border drawn around the selector when the owner rejected the selection.
pub const INVALID_STROKE: Color32 = Color32::from_rgb(220, 38, 38); // Red 600

/// Status bar colours.
pub const STATUS_BG: Color32 = Color32::from_rgb(31, 41, 55); // Gray 800
pub const STATUS_TEXT: Color32 = Color32::from_rgb(209, 213, 219); // Gray 300

/// Layout constants.
pub const SELECTOR_MENU_HEIGHT: f32 = 260.0;
pub const SELECTOR_MIN_WIDTH: f32 = 420.0;
pub const NOTIFICATION_WIDTH: f32 = 340.0;
pub const STATUS_BAR_HEIGHT: f32 = 28.0;
