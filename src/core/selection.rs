// GroupScout - core/selection.rs
//
// Selection state for the log group selector, expressed as immutable
// snapshots. Every transition returns a fresh snapshot plus, when the
// selected set changed, the report owed to the owning query editor.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{LogGroupOption, OptionView, QueryUpdate, SearchState};
use crate::core::search_term::is_template_variable;
use crate::util::constants::MAX_LOG_GROUPS;
use std::collections::HashSet;

/// Map persisted log group names to options with identical value and label.
pub fn initialize(persisted_names: &[String]) -> Vec<LogGroupOption> {
    persisted_names
        .iter()
        .map(|name| LogGroupOption::from_name(name.as_str()))
        .collect()
}

/// Union of two option sequences keyed by `value`.
///
/// Entries of `existing` keep their position and win over incoming
/// duplicates; incoming entries not yet present are appended in order.
/// Duplicates inside `incoming` itself are collapsed too.
pub fn union_merge(existing: &[LogGroupOption], incoming: &[LogGroupOption]) -> Vec<LogGroupOption> {
    let mut seen: HashSet<&str> = existing.iter().map(|o| o.value.as_str()).collect();
    let mut merged = existing.to_vec();
    for option in incoming {
        if seen.insert(option.value.as_str()) {
            merged.push(option.clone());
        }
    }
    merged
}

/// Result of a selection transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub snapshot: SelectorSnapshot,

    /// Present when the selected set was replaced and the owner must be told.
    pub report: Option<QueryUpdate>,
}

impl Transition {
    fn reported(snapshot: SelectorSnapshot) -> Self {
        let report = Some(QueryUpdate::from_selection(&snapshot.selected));
        Self { snapshot, report }
    }

    fn unchanged(snapshot: &SelectorSnapshot) -> Self {
        Self {
            snapshot: snapshot.clone(),
            report: None,
        }
    }
}

/// Everything the selector knows at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorSnapshot {
    /// Options surfaced by remote listings and searches for the current region.
    pub available: Vec<LogGroupOption>,

    /// The user's selection, in pick order.
    pub selected: Vec<LogGroupOption>,

    pub state: SearchState,
}

impl SelectorSnapshot {
    /// Build the initial snapshot from the owner's persisted names.
    ///
    /// The owner is told about the initial selection once, at mount.
    pub fn mount(persisted_names: &[String]) -> Transition {
        Transition::reported(Self {
            available: Vec::new(),
            selected: initialize(persisted_names),
            state: SearchState::default(),
        })
    }

    pub fn is_at_cap(&self) -> bool {
        self.selected.len() >= MAX_LOG_GROUPS
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|o| o.value == value)
    }

    /// An option cannot be picked once the cap is reached. Options already
    /// selected stay enabled so they can still be removed.
    pub fn is_option_disabled(&self, option: &LogGroupOption) -> bool {
        self.is_at_cap() && !self.is_selected(&option.value)
    }

    /// Remote results are region-scoped: forget them all. The selection is
    /// left alone.
    pub fn with_region_change(&self) -> Self {
        Self {
            available: Vec::new(),
            selected: self.selected.clone(),
            state: self.state,
        }
    }

    /// Union-merge a page of remote names into the available set.
    pub fn with_results(&self, names: &[String]) -> Self {
        let incoming = initialize(names);
        Self {
            available: union_merge(&self.available, &incoming),
            selected: self.selected.clone(),
            state: self.state,
        }
    }

    pub fn with_loading(&self, loading: bool) -> Self {
        let mut next = self.clone();
        next.state.loading = loading;
        next
    }

    /// Opening the menu starts a fresh interaction: clear the invalid marker.
    pub fn with_menu_opened(&self) -> Self {
        let mut next = self.clone();
        next.state.invalid = false;
        next
    }

    pub fn with_invalid(&self) -> Self {
        let mut next = self.clone();
        next.state.invalid = true;
        next
    }

    /// Replace the selected set wholesale and report it.
    ///
    /// The list is taken as given: a list longer than the cap is not
    /// truncated, it simply leaves every unselected option disabled.
    pub fn with_selection(&self, options: Vec<LogGroupOption>) -> Transition {
        Transition::reported(Self {
            available: self.available.clone(),
            selected: options,
            state: self.state,
        })
    }

    /// Append a single option. Refused at the cap or when already selected.
    pub fn with_pick(&self, option: LogGroupOption) -> Transition {
        if self.is_at_cap() || self.is_selected(&option.value) {
            return Transition::unchanged(self);
        }
        let mut selected = self.selected.clone();
        selected.push(option);
        self.with_selection(selected)
    }

    /// Append a free-text entry typed by the user.
    ///
    /// Refused when custom values are not allowed, when the name is blank,
    /// and under the same conditions as [`with_pick`](Self::with_pick).
    pub fn with_custom(&self, name: &str, allow_custom: bool) -> Transition {
        let name = name.trim();
        if !allow_custom || name.is_empty() {
            return Transition::unchanged(self);
        }
        self.with_pick(LogGroupOption::from_name(name))
    }

    /// Remove one option by value. No report if it was not selected.
    pub fn with_removed(&self, value: &str) -> Transition {
        if !self.is_selected(value) {
            return Transition::unchanged(self);
        }
        let selected = self
            .selected
            .iter()
            .filter(|o| o.value != value)
            .cloned()
            .collect();
        self.with_selection(selected)
    }

    /// Drop selected names confirmed missing from the current region.
    ///
    /// Template variables are never dropped. No report when nothing was
    /// removed.
    pub fn with_pruned_selection(&self, missing: &[String]) -> Transition {
        let missing: HashSet<&str> = missing
            .iter()
            .map(String::as_str)
            .filter(|name| !is_template_variable(name))
            .collect();
        if !self.selected.iter().any(|o| missing.contains(o.value.as_str())) {
            return Transition::unchanged(self);
        }
        let selected = self
            .selected
            .iter()
            .filter(|o| !missing.contains(o.value.as_str()))
            .cloned()
            .collect();
        self.with_selection(selected)
    }

    /// Options the selection surface should list for the current input.
    ///
    /// The union of available and selected options (selected ones survive
    /// even when no remote result mentions them), followed by the template
    /// variables, filtered by case-insensitive substring on the label.
    pub fn visible_options(&self, input: &str, template_variables: &[String]) -> Vec<OptionView> {
        let variables = initialize(template_variables);
        let combined = union_merge(&union_merge(&self.available, &self.selected), &variables);
        let needle = input.trim().to_lowercase();

        combined
            .into_iter()
            .filter(|o| needle.is_empty() || o.label.to_lowercase().contains(&needle))
            .map(|option| OptionView {
                selected: self.is_selected(&option.value),
                disabled: self.is_option_disabled(&option),
                template_variable: is_template_variable(&option.value),
                option,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(options: &[LogGroupOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn full_selection() -> SelectorSnapshot {
        let persisted: Vec<String> = (0..MAX_LOG_GROUPS).map(|i| format!("group-{i}")).collect();
        SelectorSnapshot::mount(&persisted).snapshot
    }

    #[test]
    fn test_mount_maps_names_and_reports_once() {
        let t = SelectorSnapshot::mount(&owned(&["log_group_1"]));
        assert_eq!(names(&t.snapshot.selected), vec!["log_group_1"]);
        assert_eq!(t.snapshot.selected[0].label, "log_group_1");
        assert!(t.snapshot.available.is_empty());
        assert_eq!(t.report.unwrap().log_group_names, vec!["log_group_1"]);
    }

    #[test]
    fn test_union_merge_existing_wins_and_appends_new() {
        let existing = initialize(&owned(&["a", "b"]));
        let incoming = initialize(&owned(&["b", "c", "c", "a", "d"]));
        let merged = union_merge(&existing, &incoming);
        assert_eq!(names(&merged), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_union_merge_is_idempotent() {
        let existing = initialize(&owned(&["a", "b"]));
        let once = union_merge(&existing, &existing);
        assert_eq!(once, existing);
    }

    #[test]
    fn test_region_change_clears_available_only() {
        let snap = SelectorSnapshot::mount(&owned(&["kept"]))
            .snapshot
            .with_results(&owned(&["x", "y"]));
        let next = snap.with_region_change();
        assert!(next.available.is_empty());
        assert_eq!(names(&next.selected), vec!["kept"]);

        // Only the previously selected option survives in the offered list.
        let visible = next.visible_options("", &[]);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].option.value, "kept");
        assert!(visible[0].selected);
    }

    #[test]
    fn test_cap_disables_unselected_options() {
        let snap = full_selection().with_results(&owned(&["extra"]));
        assert!(snap.is_at_cap());
        let extra = LogGroupOption::from_name("extra");
        assert!(snap.is_option_disabled(&extra));
        assert!(!snap.is_option_disabled(&LogGroupOption::from_name("group-0")));

        let t = snap.with_pick(extra);
        assert!(t.report.is_none());
        assert_eq!(t.snapshot.selected.len(), MAX_LOG_GROUPS);
    }

    #[test]
    fn test_over_cap_selection_is_not_truncated() {
        let many: Vec<LogGroupOption> = (0..MAX_LOG_GROUPS + 5)
            .map(|i| LogGroupOption::from_name(format!("g{i}")))
            .collect();
        let t = SelectorSnapshot::default().with_selection(many);
        assert_eq!(t.snapshot.selected.len(), MAX_LOG_GROUPS + 5);
        assert_eq!(t.report.unwrap().log_group_names.len(), MAX_LOG_GROUPS + 5);
    }

    #[test]
    fn test_custom_requires_permission() {
        let snap = SelectorSnapshot::default();
        assert!(snap.with_custom("mine", false).report.is_none());
        assert!(snap.with_custom("   ", true).report.is_none());

        let t = snap.with_custom("mine", true);
        assert_eq!(t.report.unwrap().log_group_names, vec!["mine"]);
        assert_eq!(t.snapshot.selected[0], LogGroupOption::from_name("mine"));
    }

    #[test]
    fn test_custom_refused_at_cap() {
        assert!(full_selection().with_custom("one-more", true).report.is_none());
    }

    #[test]
    fn test_remove() {
        let snap = SelectorSnapshot::mount(&owned(&["a", "b"])).snapshot;
        assert!(snap.with_removed("zzz").report.is_none());
        let t = snap.with_removed("a");
        assert_eq!(t.report.unwrap().log_group_names, vec!["b"]);
    }

    #[test]
    fn test_prune_drops_only_missing_names() {
        let snap = SelectorSnapshot::mount(&owned(&["gone", "$env", "here"])).snapshot;
        let t = snap.with_pruned_selection(&owned(&["gone", "$env"]));
        assert_eq!(t.report.unwrap().log_group_names, vec!["$env", "here"]);
    }

    #[test]
    fn test_prune_without_missing_names_is_silent() {
        let snap = SelectorSnapshot::mount(&owned(&["here"])).snapshot;
        let t = snap.with_pruned_selection(&owned(&["never-selected"]));
        assert!(t.report.is_none());
        assert_eq!(names(&t.snapshot.selected), vec!["here"]);
    }

    #[test]
    fn test_visible_options_filter_and_template_variables() {
        let snap = SelectorSnapshot::default().with_results(&owned(&[
            "WaterGroup",
            "WaterGroup2",
            "VelvetGroup",
        ]));
        let vars = owned(&["$water_group"]);

        let water = snap.visible_options("water", &vars);
        let values: Vec<&str> = water.iter().map(|v| v.option.value.as_str()).collect();
        assert_eq!(values, vec!["WaterGroup", "WaterGroup2", "$water_group"]);
        assert!(water[2].template_variable);
        assert!(!water[0].template_variable);

        assert_eq!(snap.visible_options("", &vars).len(), 4);
    }

    #[test]
    fn test_menu_open_clears_invalid() {
        let snap = SelectorSnapshot::default().with_invalid();
        assert!(snap.state.invalid);
        assert!(!snap.with_menu_opened().state.invalid);
    }
}
