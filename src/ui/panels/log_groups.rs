// GroupScout - ui/panels/log_groups.rs
//
// "Log Groups" multi-select: chips for the current selection, a search box
// feeding the controller, and the option menu underneath.
//
// Every report the controller returns is applied to the owner's query here,
// so the query always mirrors the selection.

use crate::app::controller::LogGroupSearchController;
use crate::app::state::AppState;
use crate::core::model::{InputAction, LogGroupOption, QueryUpdate};
use crate::ui::theme;
use crate::util::constants::{MAX_LOG_GROUPS, MAX_VISIBLE_VALUES};

/// Menu visibility, kept in egui memory so the panel stays stateless.
fn menu_id() -> egui::Id {
    egui::Id::new("log_groups_menu_open")
}

/// Render the selector.
pub fn render(ui: &mut egui::Ui, state: &mut AppState, selector: &mut LogGroupSearchController) {
    let mut updates: Vec<QueryUpdate> = Vec::new();
    let invalid = selector.state().invalid;

    let mut frame = egui::Frame::group(ui.style());
    if invalid {
        frame = frame.stroke(egui::Stroke::new(1.5, theme::INVALID_STROKE));
    }

    frame.show(ui, |ui| {
        ui.set_min_width(theme::SELECTOR_MIN_WIDTH);

        ui.horizontal(|ui| {
            ui.strong("Log Groups");
            ui.label(
                egui::RichText::new(format!(
                    "{}/{MAX_LOG_GROUPS}",
                    selector.selected().len()
                ))
                .weak(),
            );
            if selector.is_loading() {
                ui.spinner();
            }
        });

        render_chips(ui, selector, &mut updates);
        render_search_box(ui, state, selector, &mut updates);

        let menu_open = ui.data(|d| d.get_temp::<bool>(menu_id()).unwrap_or(false));
        if menu_open {
            render_menu(ui, state, selector, &mut updates);
        }

        if invalid {
            ui.colored_label(
                theme::INVALID_STROKE,
                "The query rejected these log groups.",
            );
        }
    });

    for update in &updates {
        if !state.apply_query_update(update) {
            selector.mark_invalid();
        }
    }
}

/// Selected values as removable chips, the first few shown then `+N`.
fn render_chips(
    ui: &mut egui::Ui,
    selector: &mut LogGroupSearchController,
    updates: &mut Vec<QueryUpdate>,
) {
    let selected = selector.selected_names();
    if selected.is_empty() {
        return;
    }

    let mut remove: Option<String> = None;
    let mut clear = false;

    ui.horizontal_wrapped(|ui| {
        for name in selected.iter().take(MAX_VISIBLE_VALUES) {
            let chip = egui::Button::new(
                egui::RichText::new(format!("{name}  \u{2715}")).color(theme::CHIP_TEXT),
            )
            .fill(theme::CHIP_BG)
            .small();
            if ui.add(chip).on_hover_text("Remove").clicked() {
                remove = Some(name.clone());
            }
        }

        let hidden = selected.len().saturating_sub(MAX_VISIBLE_VALUES);
        if hidden > 0 {
            ui.label(egui::RichText::new(format!("+{hidden}")).strong())
                .on_hover_text(selected[MAX_VISIBLE_VALUES..].join("\n"));
        }

        if ui.small_button("Clear").clicked() {
            clear = true;
        }
    });

    if clear {
        updates.push(selector.clear());
    } else if let Some(name) = remove {
        updates.extend(selector.remove(&name));
    }
}

/// Search box. Typing arms the debounced search; Enter creates a custom
/// value when allowed.
fn render_search_box(
    ui: &mut egui::Ui,
    state: &mut AppState,
    selector: &mut LogGroupSearchController,
    updates: &mut Vec<QueryUpdate>,
) {
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.search_input)
                .hint_text("Choose Log Groups")
                .desired_width(ui.available_width() - 32.0),
        );

        if response.gained_focus() {
            open_menu(ui, selector);
        }
        if response.changed() {
            selector.on_input_change(&state.search_input, InputAction::InputChange);
        }
        if response.lost_focus() {
            selector.on_input_change(&state.search_input, InputAction::InputBlur);
            if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                if selector.config().allow_custom_value {
                    if let Some(update) = selector.create_custom(&state.search_input) {
                        updates.push(update);
                        state.search_input.clear();
                    }
                } else {
                    selector.flush_search();
                }
            }
        }

        let menu_open = ui.data(|d| d.get_temp::<bool>(menu_id()).unwrap_or(false));
        let toggle = if menu_open { "\u{25b4}" } else { "\u{25be}" };
        if ui.small_button(toggle).clicked() {
            if menu_open {
                ui.data_mut(|d| d.insert_temp(menu_id(), false));
                selector.on_input_change(&state.search_input, InputAction::MenuClose);
            } else {
                open_menu(ui, selector);
            }
        }
    });
}

fn open_menu(ui: &mut egui::Ui, selector: &mut LogGroupSearchController) {
    ui.data_mut(|d| d.insert_temp(menu_id(), true));
    selector.on_menu_open();
}

/// The option list under the search box.
fn render_menu(
    ui: &mut egui::Ui,
    state: &mut AppState,
    selector: &mut LogGroupSearchController,
    updates: &mut Vec<QueryUpdate>,
) {
    let options = selector.visible_options(&state.search_input);
    let input = state.search_input.trim().to_string();

    let mut toggled: Option<(String, bool)> = None;
    let mut create = false;

    egui::ScrollArea::vertical()
        .id_salt("log_groups_menu")
        .max_height(theme::SELECTOR_MENU_HEIGHT)
        .show(ui, |ui| {
            if selector.is_loading() && options.is_empty() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak("Loading log groups\u{2026}");
                });
            } else if options.is_empty() {
                ui.weak("No log groups available");
            }

            for view in &options {
                let mut text = egui::RichText::new(&view.option.label);
                if view.template_variable {
                    text = text.color(theme::TEMPLATE_VARIABLE_TEXT);
                }
                let response = ui
                    .add_enabled(!view.disabled, egui::SelectableLabel::new(view.selected, text))
                    .on_disabled_hover_text(format!(
                        "At most {MAX_LOG_GROUPS} log groups can be selected"
                    ));
                if response.clicked() {
                    toggled = Some((view.option.value.clone(), view.selected));
                }
            }

            let already_listed = options.iter().any(|v| v.option.value == input);
            if selector.config().allow_custom_value && !input.is_empty() && !already_listed {
                ui.separator();
                let button = egui::Button::new(format!("Create: {input}"));
                if ui.add_enabled(!selector.is_at_cap(), button).clicked() {
                    create = true;
                }
            }
        });

    if create {
        if let Some(update) = selector.create_custom(&input) {
            updates.push(update);
            state.search_input.clear();
        }
    } else if let Some((value, was_selected)) = toggled {
        let update = if was_selected {
            selector.remove(&value)
        } else {
            selector.pick(LogGroupOption::from_name(value))
        };
        updates.extend(update);
    }
}
