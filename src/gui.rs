// GroupScout - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the UI panels and drives the log group selector: each
// frame ticks the controller, applies any report to the query, and
// schedules the next repaint around pending searches.

use crate::app::controller::LogGroupSearchController;
use crate::app::state::AppState;
use crate::ui;
use crate::util::constants;
use std::time::{Duration, Instant};

/// The GroupScout application.
pub struct GroupScoutApp {
    pub state: AppState,
    pub selector: LogGroupSearchController,
}

impl GroupScoutApp {
    pub fn new(state: AppState, selector: LogGroupSearchController) -> Self {
        Self { state, selector }
    }

    /// Repaint soon enough to fire a pending search and to pick up results.
    fn schedule_repaint(&self, ctx: &egui::Context, notifications_showing: bool) {
        let mut next: Option<Duration> = None;
        let mut consider = |d: Duration| {
            next = Some(next.map_or(d, |n| n.min(d)));
        };

        if let Some(until) = self.selector.time_until_search(Instant::now()) {
            consider(until);
        }
        if self.selector.is_loading() {
            consider(Duration::from_millis(constants::SEARCH_POLL_INTERVAL_MS));
        }
        if notifications_showing {
            consider(Duration::from_secs(1));
        }

        if let Some(after) = next {
            ctx.request_repaint_after(after);
        }
    }
}

impl eframe::App for GroupScoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(update) = self.selector.tick() {
            if !self.state.apply_query_update(&update) {
                self.selector.mark_invalid();
            }
        }

        // Query header: region and expression.
        egui::TopBottomPanel::top("query_header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui::panels::query_header::render(ui, &mut self.state, &mut self.selector);
            ui.add_space(4.0);
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(egui::Frame::default().fill(ui::theme::STATUS_BG).inner_margin(4.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(ui::theme::STATUS_TEXT, &self.state.status_message);
                    if !self.state.warnings.is_empty() {
                        ui.separator();
                        ui.colored_label(
                            ui::theme::notification_colour(
                                crate::core::model::NotificationLevel::Warning,
                            ),
                            format!("{} startup warning(s)", self.state.warnings.len()),
                        )
                        .on_hover_text(self.state.warnings.join("\n"));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(ref run) = self.state.last_run {
                            ui.colored_label(
                                ui::theme::STATUS_TEXT,
                                format!(
                                    "Run #{} at {}",
                                    self.state.run_count,
                                    run.ran_at.format("%H:%M:%S")
                                ),
                            );
                        }
                        if self.state.debug_mode {
                            ui.colored_label(ui::theme::STATUS_TEXT, "DEBUG");
                        }
                    });
                });
            });

        // Central panel: the log group selector.
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::log_groups::render(ui, &mut self.state, &mut self.selector);
        });

        let showing = ui::panels::notifications::render(ctx, &mut self.state);
        self.schedule_repaint(ctx, showing);
    }

    /// Called by eframe when the application window is about to close.
    ///
    /// Saves the current session so the next launch can restore it.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.save_session();
    }
}
