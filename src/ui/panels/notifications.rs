// GroupScout - ui/panels/notifications.rs
//
// Notification stack in the top-right corner. Each notification shows for a
// few seconds or until dismissed; the full history stays in the center.

use crate::app::state::AppState;
use crate::ui::theme;
use crate::util::constants::NOTIFICATION_DISPLAY_SECS;
use chrono::Utc;

/// Render recent notifications. Returns true while any are still showing,
/// so the caller can schedule a repaint for their expiry.
pub fn render(ctx: &egui::Context, state: &mut AppState) -> bool {
    let now = Utc::now();
    let visible: Vec<(usize, _)> = state
        .notifications
        .snapshot()
        .into_iter()
        .enumerate()
        .filter(|(_, n)| (now - n.raised_at).num_seconds() < NOTIFICATION_DISPLAY_SECS)
        .collect();

    if visible.is_empty() {
        return false;
    }

    let mut dismiss: Option<usize> = None;
    egui::Area::new(egui::Id::new("notification_stack"))
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 48.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_max_width(theme::NOTIFICATION_WIDTH);
            for (index, notification) in visible.iter().rev() {
                let colour = theme::notification_colour(notification.level);
                egui::Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(1.0, colour))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(colour, notification.level.label());
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.small_button("\u{2715}").clicked() {
                                        dismiss = Some(*index);
                                    }
                                },
                            );
                        });
                        ui.label(&notification.message);
                    });
                ui.add_space(4.0);
            }
        });

    if let Some(index) = dismiss {
        state.notifications.dismiss(index);
    }
    true
}
