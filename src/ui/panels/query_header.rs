// GroupScout - ui/panels/query_header.rs
//
// Query editor header: region picker, query expression, and the run button.

use crate::app::controller::LogGroupSearchController;
use crate::app::state::AppState;

/// Render the header (top panel).
pub fn render(ui: &mut egui::Ui, state: &mut AppState, selector: &mut LogGroupSearchController) {
    ui.horizontal(|ui| {
        ui.strong(format!("Query {}", state.query.ref_id));
        ui.separator();

        ui.label("Region:");
        let mut chosen: Option<String> = None;
        egui::ComboBox::from_id_salt("region_picker")
            .selected_text(&state.query.region)
            .width(180.0)
            .show_ui(ui, |ui| {
                if !state.recent_regions.is_empty() {
                    ui.weak("Recent");
                    for region in &state.recent_regions {
                        if ui
                            .selectable_label(*region == state.query.region, region)
                            .clicked()
                        {
                            chosen = Some(region.clone());
                        }
                    }
                    ui.separator();
                }
                for region in &state.regions {
                    if ui
                        .selectable_label(*region == state.query.region, region)
                        .clicked()
                    {
                        chosen = Some(region.clone());
                    }
                }
            });

        if let Some(region) = chosen {
            if region != state.query.region {
                state.set_region(&region);
                selector.set_region(region);
                state.status_message = format!("Region set to {}.", state.query.region);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("\u{25b6} Run query").clicked() && !state.run_query() {
                selector.mark_invalid();
            }
        });
    });

    ui.add_space(4.0);
    ui.label("Query:");
    ui.add(
        egui::TextEdit::multiline(&mut state.query.expression)
            .code_editor()
            .desired_rows(3)
            .desired_width(f32::INFINITY)
            .hint_text("fields @timestamp, @message | sort @timestamp desc"),
    );
}
