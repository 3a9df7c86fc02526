// GroupScout - app/controller.rs
//
// LogGroupSearchController: owns the available and selected log groups for
// one logs query, runs debounced region-scoped searches, and reports the
// selection to the owning query editor.
//
// Architecture:
//   - The controller lives on the UI thread. State changes go through the
//     pure transitions in `core::selection`; the controller only swaps in the
//     resulting snapshot and hands any report back to its caller.
//   - Typing arms a `Debouncer`; `tick` fires it and issues the remote call
//     through `SearchManager`, then drains finished requests.
//   - Only requests issued since the last region change are applied. Anything
//     older is dropped on arrival, failures included, and never counts toward
//     `loading`. Superseded searches in the same region merge harmlessly.
//   - Remote failures become one error notification through the injected
//     `NotificationSink`; nothing propagates to the caller.
//   - Pruning after a region change looks up each selected name in the new
//     region by exact name. A name is dropped only when its lookup succeeds
//     without it.

use crate::app::notify::NotificationSink;
use crate::app::search::SearchManager;
use crate::app::source::LogGroupSource;
use crate::core::debounce::Debouncer;
use crate::core::model::{
    DescribeLogGroupsRequest, InputAction, LogGroupOption, Notification, OptionView, QueryUpdate,
    RequestKind, SearchProgress, SearchState,
};
use crate::core::search_term::is_valid_search_term;
use crate::core::selection::{SelectorSnapshot, Transition};
use crate::util::constants;
use crate::core::search_term::is_template_variable;
use crate::util::error::SearchError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

// =============================================================================
// Configuration
// =============================================================================

/// Behaviour switches for one controller instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Reference ID of the owning query, forwarded with every request.
    pub ref_id: String,

    /// Whether free-text log group names may be added.
    pub allow_custom_value: bool,

    /// Quiet period before a typed search term is sent.
    pub debounce: Duration,

    /// Size of the unprefixed listing issued at mount and after each region
    /// change. `None` disables the listing.
    pub preload_limit: Option<usize>,

    /// After a region change, look up every selected name in the new region
    /// and drop the ones it does not have (template variables are always
    /// kept). A report is made only when something was dropped.
    pub prune_on_region_change: bool,

    /// Template variable names offered alongside remote results.
    pub template_variables: Vec<String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            ref_id: constants::DEFAULT_REF_ID.to_string(),
            allow_custom_value: false,
            debounce: Duration::from_millis(constants::DEFAULT_SEARCH_DEBOUNCE_MS),
            preload_limit: Some(constants::DEFAULT_PRELOAD_LIMIT),
            prune_on_region_change: false,
            template_variables: Vec::new(),
        }
    }
}

/// Exact-name lookups still outstanding after a region change.
#[derive(Debug, Default)]
struct PruneCheck {
    /// Request ID to the selected name it looks up.
    outstanding: HashMap<u64, String>,

    /// Names the new region confirmed it does not have.
    missing: Vec<String>,
}

// =============================================================================
// Controller
// =============================================================================

/// Search-and-select controller for the log groups of one logs query.
pub struct LogGroupSearchController {
    config: ControllerConfig,
    region: String,
    snapshot: SelectorSnapshot,
    debouncer: Debouncer<String>,
    search: SearchManager,
    source: Arc<dyn LogGroupSource>,
    sink: Box<dyn NotificationSink>,
    next_request_id: u64,

    /// Requests issued in the current region whose outcome has not arrived.
    current_requests: HashSet<u64>,

    prune: Option<PruneCheck>,
}

impl LogGroupSearchController {
    /// Create the controller from the owner's persisted log group names.
    ///
    /// Returns the controller together with the initial report, which the
    /// owner receives exactly once here.
    pub fn mount(
        config: ControllerConfig,
        region: impl Into<String>,
        persisted_names: &[String],
        source: Arc<dyn LogGroupSource>,
        sink: Box<dyn NotificationSink>,
    ) -> (Self, QueryUpdate) {
        let Transition { snapshot, .. } = SelectorSnapshot::mount(persisted_names);
        let initial = QueryUpdate::from_selection(&snapshot.selected);

        let mut controller = Self {
            debouncer: Debouncer::new(config.debounce),
            config,
            region: region.into(),
            snapshot,
            search: SearchManager::new(),
            source,
            sink,
            next_request_id: 1,
            current_requests: HashSet::new(),
            prune: None,
        };

        tracing::info!(
            region = %controller.region,
            selected = controller.snapshot.selected.len(),
            "Log group selector mounted"
        );

        if let Some(limit) = controller.config.preload_limit {
            controller.issue(RequestKind::InitialLoad, None, Some(limit));
        }

        (controller, initial)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn snapshot(&self) -> &SelectorSnapshot {
        &self.snapshot
    }

    pub fn available(&self) -> &[LogGroupOption] {
        &self.snapshot.available
    }

    pub fn selected(&self) -> &[LogGroupOption] {
        &self.snapshot.selected
    }

    pub fn selected_names(&self) -> Vec<String> {
        self.snapshot.selected.iter().map(|o| o.value.clone()).collect()
    }

    pub fn state(&self) -> SearchState {
        self.snapshot.state
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.state.loading
    }

    pub fn is_at_cap(&self) -> bool {
        self.snapshot.is_at_cap()
    }

    pub fn is_option_disabled(&self, option: &LogGroupOption) -> bool {
        self.snapshot.is_option_disabled(option)
    }

    /// Options the selection surface should list for the current input.
    pub fn visible_options(&self, input: &str) -> Vec<OptionView> {
        self.snapshot
            .visible_options(input, &self.config.template_variables)
    }

    /// A typed search is waiting for its debounce window.
    pub fn is_search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Time until the pending search fires, for repaint scheduling.
    pub fn time_until_search(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_fire(now)
    }

    // -------------------------------------------------------------------------
    // Region
    // -------------------------------------------------------------------------

    /// Switch to `region`: forget all remote results and drop any search
    /// still waiting for its debounce window. The selection is kept.
    pub fn set_region(&mut self, region: impl Into<String>) {
        let region = region.into();
        if region == self.region {
            return;
        }

        tracing::info!(from = %self.region, to = %region, "Log group region changed");

        if let Some(dropped) = self.debouncer.cancel() {
            tracing::debug!(term = %dropped, "Pending search dropped by region change");
        }
        if !self.current_requests.is_empty() {
            tracing::debug!(
                outstanding = self.current_requests.len(),
                "Outstanding requests left behind by region change"
            );
        }
        self.current_requests.clear();
        self.prune = None;
        self.snapshot = self.snapshot.with_region_change();
        self.region = region;

        if let Some(limit) = self.config.preload_limit {
            self.issue(RequestKind::RegionLoad, None, Some(limit));
        }
        if self.config.prune_on_region_change {
            self.start_prune_check();
        }
        self.refresh_loading();
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Request a search for `term` in the current region (debounced).
    pub fn search(&mut self, term: &str) {
        self.search_at(term, Instant::now());
    }

    pub fn search_at(&mut self, term: &str, now: Instant) {
        self.on_input_change_at(term, InputAction::InputChange, now);
    }

    /// Feed a search box text change from the selection surface.
    pub fn on_input_change(&mut self, term: &str, action: InputAction) {
        self.on_input_change_at(term, action, Instant::now());
    }

    /// Only [`InputAction::InputChange`] arms a search. The term is validated
    /// when the debounce fires, so the last keystroke of a burst decides
    /// whether a remote call happens at all.
    pub fn on_input_change_at(&mut self, term: &str, action: InputAction, now: Instant) {
        if action != InputAction::InputChange {
            tracing::trace!(?action, "Input change ignored");
            return;
        }
        self.debouncer.trigger_at(term.to_string(), now);
    }

    /// Fire a pending search immediately, ignoring the debounce window.
    pub fn flush_search(&mut self) {
        if let Some(term) = self.debouncer.cancel() {
            self.fire(term);
        }
    }

    /// Advance timers and apply finished requests.
    ///
    /// Returns a report when applying a result changed the selection.
    pub fn tick(&mut self) -> Option<QueryUpdate> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<QueryUpdate> {
        if let Some(term) = self.debouncer.tick_at(now) {
            self.fire(term);
        }

        let mut report = None;
        for msg in self
            .search
            .poll_progress(constants::MAX_SEARCH_MESSAGES_PER_FRAME)
        {
            if let Some(update) = self.apply(msg) {
                report = Some(update);
            }
        }
        self.refresh_loading();
        report
    }

    /// Block until one outstanding request completes and apply it.
    ///
    /// Returns immediately when nothing is outstanding.
    pub fn wait_for_search(&mut self, timeout: Duration) -> Option<QueryUpdate> {
        let report = self
            .search
            .wait_progress(timeout)
            .and_then(|msg| self.apply(msg));
        self.refresh_loading();
        report
    }

    /// Block until every outstanding request has been applied or `timeout`
    /// elapses. Does not fire a search still waiting for its debounce window.
    ///
    /// Returns the reports produced along the way, oldest first.
    pub fn settle(&mut self, timeout: Duration) -> Vec<QueryUpdate> {
        let deadline = Instant::now() + timeout;
        let mut reports = Vec::new();

        while self.search.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!(
                    outstanding = self.search.in_flight(),
                    "Timed out waiting for log group requests"
                );
                break;
            }
            if let Some(msg) = self.search.wait_progress(remaining) {
                if let Some(update) = self.apply(msg) {
                    reports.push(update);
                }
            }
        }

        self.refresh_loading();
        reports
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Replace the selection and report it.
    pub fn select(&mut self, options: Vec<LogGroupOption>) -> QueryUpdate {
        let Transition { snapshot, .. } = self.snapshot.with_selection(options);
        self.snapshot = snapshot;
        tracing::debug!(selected = self.snapshot.selected.len(), "Log groups selected");
        QueryUpdate::from_selection(&self.snapshot.selected)
    }

    /// Add one option. Refused at the cap or when already selected.
    pub fn pick(&mut self, option: LogGroupOption) -> Option<QueryUpdate> {
        let transition = self.snapshot.with_pick(option);
        self.commit(transition)
    }

    /// Add a free-text log group name, if custom values are allowed.
    pub fn create_custom(&mut self, name: &str) -> Option<QueryUpdate> {
        let transition = self
            .snapshot
            .with_custom(name, self.config.allow_custom_value);
        if transition.report.is_none() {
            tracing::debug!(
                allowed = self.config.allow_custom_value,
                at_cap = self.is_at_cap(),
                "Custom log group refused"
            );
        }
        self.commit(transition)
    }

    /// Remove one selected option.
    pub fn remove(&mut self, value: &str) -> Option<QueryUpdate> {
        let transition = self.snapshot.with_removed(value);
        self.commit(transition)
    }

    /// Remove every selected option.
    pub fn clear(&mut self) -> QueryUpdate {
        self.select(Vec::new())
    }

    // -------------------------------------------------------------------------
    // Validation flag
    // -------------------------------------------------------------------------

    /// The option menu opened: start a fresh interaction.
    pub fn on_menu_open(&mut self) {
        self.snapshot = self.snapshot.with_menu_opened();
    }

    /// The owner's last query run rejected the selected log groups.
    pub fn mark_invalid(&mut self) {
        self.snapshot = self.snapshot.with_invalid();
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn commit(&mut self, transition: Transition) -> Option<QueryUpdate> {
        self.snapshot = transition.snapshot;
        transition.report
    }

    fn fire(&mut self, term: String) {
        if !is_valid_search_term(&term) {
            // Usually a template variable being typed; not an error.
            tracing::debug!(%term, "Search term not searchable, skipping");
            return;
        }
        self.issue(RequestKind::Search, Some(term), None);
    }

    fn start_prune_check(&mut self) {
        let names: Vec<String> = self
            .snapshot
            .selected
            .iter()
            .map(|o| o.value.clone())
            .filter(|name| !is_template_variable(name))
            .collect();
        if names.is_empty() {
            return;
        }

        let mut check = PruneCheck::default();
        for name in names {
            let id = self.issue(RequestKind::ExistenceCheck, Some(name.clone()), None);
            check.outstanding.insert(id, name);
        }
        tracing::debug!(
            lookups = check.outstanding.len(),
            region = %self.region,
            "Checking selected log groups in new region"
        );
        self.prune = Some(check);
    }

    /// Record one lookup outcome; once the last one is in, prune.
    fn record_lookup(&mut self, request_id: u64, exists: bool) -> Option<QueryUpdate> {
        let check = self.prune.as_mut()?;
        let name = check.outstanding.remove(&request_id)?;
        if !exists {
            check.missing.push(name);
        }
        if !check.outstanding.is_empty() {
            return None;
        }

        let missing = self.prune.take().map(|c| c.missing).unwrap_or_default();
        let transition = self.snapshot.with_pruned_selection(&missing);
        if transition.report.is_some() {
            tracing::info!(
                dropped = ?missing,
                region = %self.region,
                "Selection pruned to log groups in new region"
            );
        }
        self.commit(transition)
    }

    fn issue(&mut self, kind: RequestKind, prefix: Option<String>, limit: Option<usize>) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let request = DescribeLogGroupsRequest {
            ref_id: self.config.ref_id.clone(),
            region: self.region.clone(),
            log_group_name_prefix: prefix,
            limit,
        };
        self.search
            .start(request_id, kind, request, Arc::clone(&self.source));
        self.current_requests.insert(request_id);
        self.snapshot = self.snapshot.with_loading(true);
        request_id
    }

    fn apply(&mut self, msg: SearchProgress) -> Option<QueryUpdate> {
        if !self.current_requests.remove(&msg.request_id()) {
            tracing::debug!(
                request_id = msg.request_id(),
                current = %self.region,
                "Discarding outcome of a request from a previous region"
            );
            return None;
        }

        match msg {
            SearchProgress::Completed {
                request_id,
                kind: RequestKind::ExistenceCheck,
                request,
                names,
            } => {
                let name = request.log_group_name_prefix.unwrap_or_default();
                let exists = names.iter().any(|n| *n == name);
                tracing::trace!(request_id, %name, exists, "Log group lookup completed");
                self.record_lookup(request_id, exists)
            }
            SearchProgress::Completed {
                request_id,
                kind,
                names,
                ..
            } => {
                let before = self.snapshot.available.len();
                self.snapshot = self.snapshot.with_results(&names);
                tracing::debug!(
                    request_id,
                    ?kind,
                    returned = names.len(),
                    added = self.snapshot.available.len() - before,
                    "Log group results merged"
                );
                None
            }
            SearchProgress::Failed {
                request_id,
                kind,
                request,
                error,
                panicked,
            } => {
                let message = error.display_message();
                let err = if panicked {
                    SearchError::WorkerPanicked {
                        region: request.region,
                        message,
                    }
                } else {
                    SearchError::Remote {
                        region: request.region,
                        prefix: request.log_group_name_prefix,
                        message,
                    }
                };
                tracing::warn!(request_id, ?kind, error = %err, "Log group request failed");
                self.sink.publish(Notification::error(err.user_message()));

                // An unanswered lookup keeps its name.
                if kind == RequestKind::ExistenceCheck {
                    return self.record_lookup(request_id, true);
                }
                None
            }
        }
    }

    fn refresh_loading(&mut self) {
        let loading = !self.current_requests.is_empty();
        if loading != self.snapshot.state.loading {
            self.snapshot = self.snapshot.with_loading(loading);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::notify::NotificationCenter;
    use crate::core::model::RemoteError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const SETTLE: Duration = Duration::from_secs(5);

    /// In-process source recording every call it serves.
    #[derive(Default)]
    struct FakeSource {
        by_region: HashMap<String, Vec<String>>,
        fail_with: Option<RemoteError>,
        /// Restricts `fail_with` to one region.
        fail_region: Option<String>,
        calls: Mutex<Vec<DescribeLogGroupsRequest>>,
    }

    impl FakeSource {
        fn with_region(mut self, region: &str, names: &[&str]) -> Self {
            self.by_region.insert(
                region.to_string(),
                names.iter().map(|s| s.to_string()).collect(),
            );
            self
        }

        fn failing(error: RemoteError) -> Self {
            Self {
                fail_with: Some(error),
                ..Default::default()
            }
        }

        fn failing_in(mut self, region: &str, error: RemoteError) -> Self {
            self.fail_with = Some(error);
            self.fail_region = Some(region.to_string());
            self
        }

        fn calls(&self) -> Vec<DescribeLogGroupsRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl LogGroupSource for FakeSource {
        fn describe_log_groups(
            &self,
            request: &DescribeLogGroupsRequest,
        ) -> Result<Vec<String>, RemoteError> {
            self.calls.lock().unwrap().push(request.clone());
            if let Some(ref err) = self.fail_with {
                if self.fail_region.as_ref().map_or(true, |r| *r == request.region) {
                    return Err(err.clone());
                }
            }
            let prefix = request.log_group_name_prefix.as_deref().unwrap_or("");
            Ok(self
                .by_region
                .get(&request.region)
                .map(|names| {
                    names
                        .iter()
                        .filter(|n| n.starts_with(prefix))
                        .take(request.limit.unwrap_or(usize::MAX))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn no_preload() -> ControllerConfig {
        ControllerConfig {
            preload_limit: None,
            ..Default::default()
        }
    }

    fn mount(
        config: ControllerConfig,
        region: &str,
        persisted: &[&str],
        source: &Arc<FakeSource>,
    ) -> (LogGroupSearchController, QueryUpdate, NotificationCenter) {
        let center = NotificationCenter::new();
        let persisted: Vec<String> = persisted.iter().map(|s| s.to_string()).collect();
        let dyn_source: Arc<dyn LogGroupSource> = source.clone();
        let (controller, initial) = LogGroupSearchController::mount(
            config,
            region,
            &persisted,
            dyn_source,
            Box::new(center.clone()),
        );
        (controller, initial, center)
    }

    fn values(options: &[LogGroupOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn test_mount_reports_persisted_names_once() {
        let source = Arc::new(FakeSource::default());
        let (controller, initial, _) = mount(no_preload(), "region1", &["log_group_1"], &source);
        assert_eq!(initial.log_group_names, vec!["log_group_1"]);
        assert_eq!(values(controller.selected()), vec!["log_group_1"]);
        assert!(controller.available().is_empty());
        assert!(source.calls().is_empty());
    }

    #[test]
    fn test_region_switch_then_clear_reports_empty() {
        let source = Arc::new(FakeSource::default());
        let (mut controller, initial, _) =
            mount(no_preload(), "region1", &["log_group_1"], &source);
        assert_eq!(initial.log_group_names, vec!["log_group_1"]);

        controller.set_region("region2");
        assert_eq!(values(controller.selected()), vec!["log_group_1"]);
        let update = controller.select(Vec::new());
        assert!(update.log_group_names.is_empty());
    }

    #[test]
    fn test_debounce_collapses_burst_into_one_call() {
        let source = Arc::new(FakeSource::default().with_region("r", &["abc-1", "abd"]));
        let (mut controller, _, _) = mount(no_preload(), "r", &[], &source);
        let t0 = Instant::now();

        controller.search_at("a", t0);
        controller.search_at("ab", t0 + Duration::from_millis(100));
        controller.search_at("abc", t0 + Duration::from_millis(200));
        controller.tick_at(t0 + Duration::from_millis(450));
        assert!(source.calls().is_empty(), "window re-armed by the last keystroke");
        assert!(controller.is_search_pending());

        controller.tick_at(t0 + Duration::from_millis(500));
        controller.settle(SETTLE);

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].log_group_name_prefix.as_deref(), Some("abc"));
        assert_eq!(calls[0].region, "r");
        assert_eq!(values(controller.available()), vec!["abc-1"]);
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_invalid_term_makes_no_remote_call() {
        let source = Arc::new(FakeSource::default().with_region("r", &["x"]));
        let (mut controller, _, center) = mount(no_preload(), "r", &[], &source);
        let t0 = Instant::now();

        controller.search_at("$foo", t0);
        controller.tick_at(t0 + Duration::from_secs(1));
        controller.settle(SETTLE);

        assert!(source.calls().is_empty());
        assert!(controller.available().is_empty());
        assert!(center.is_empty(), "invalid terms are not surfaced");
    }

    #[test]
    fn test_last_keystroke_decides_even_when_invalid() {
        let source = Arc::new(FakeSource::default().with_region("r", &["abc"]));
        let (mut controller, _, _) = mount(no_preload(), "r", &[], &source);
        let t0 = Instant::now();

        controller.search_at("abc", t0);
        controller.search_at("abc$", t0 + Duration::from_millis(50));
        controller.tick_at(t0 + Duration::from_secs(1));
        controller.settle(SETTLE);
        assert!(source.calls().is_empty());
    }

    #[test]
    fn test_non_typing_input_actions_are_ignored() {
        let source = Arc::new(FakeSource::default().with_region("r", &["abc"]));
        let (mut controller, _, _) = mount(no_preload(), "r", &[], &source);
        let t0 = Instant::now();

        for action in [
            InputAction::SetValue,
            InputAction::InputBlur,
            InputAction::MenuClose,
        ] {
            controller.on_input_change_at("abc", action, t0);
        }
        assert!(!controller.is_search_pending());
        controller.tick_at(t0 + Duration::from_secs(1));
        assert!(source.calls().is_empty());
    }

    #[test]
    fn test_remote_failure_notifies_once_and_keeps_available() {
        let source = Arc::new(FakeSource::failing(RemoteError::from("boom")));
        let (mut controller, _, center) = mount(no_preload(), "r", &[], &source);
        let t0 = Instant::now();

        controller.search_at("abc", t0);
        controller.tick_at(t0 + Duration::from_millis(300));
        controller.settle(SETTLE);

        let notes = center.snapshot();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains("boom"));
        assert!(controller.available().is_empty());
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_structured_failure_is_stringified() {
        let source = Arc::new(FakeSource::failing(RemoteError::from(
            serde_json::json!({"code": "ThrottlingException"}),
        )));
        let (mut controller, _, center) = mount(no_preload(), "r", &[], &source);
        controller.search("abc");
        controller.flush_search();
        controller.settle(SETTLE);
        assert_eq!(
            center.snapshot()[0].message,
            r#"{"code":"ThrottlingException"}"#
        );
    }

    #[test]
    fn test_loading_is_set_while_in_flight() {
        let source = Arc::new(FakeSource::default().with_region("r", &["abc"]));
        let (mut controller, _, _) = mount(no_preload(), "r", &[], &source);
        controller.search("abc");
        controller.flush_search();
        assert!(controller.is_loading());
        controller.settle(SETTLE);
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_wait_for_search_applies_one_result() {
        let source = Arc::new(FakeSource::default().with_region("r", &["abc"]));
        let (mut controller, _, _) = mount(no_preload(), "r", &[], &source);
        assert!(controller.wait_for_search(Duration::from_secs(60)).is_none());

        controller.search("abc");
        controller.flush_search();
        controller.wait_for_search(SETTLE);
        assert_eq!(values(controller.available()), vec!["abc"]);
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_results_for_previous_region_are_discarded() {
        let source = Arc::new(
            FakeSource::default()
                .with_region("region1", &["old-group"])
                .with_region("region2", &["new-group"]),
        );
        let (mut controller, _, _) = mount(no_preload(), "region1", &[], &source);
        controller.search("old");
        controller.flush_search();

        // The request is already out; switch before its result is applied.
        controller.set_region("region2");
        controller.settle(SETTLE);

        assert_eq!(source.calls().len(), 1);
        assert!(controller.available().is_empty());
    }

    #[test]
    fn test_region_change_drops_pending_search() {
        let source = Arc::new(FakeSource::default().with_region("region1", &["abc"]));
        let (mut controller, _, _) = mount(no_preload(), "region1", &[], &source);
        let t0 = Instant::now();
        controller.search_at("abc", t0);
        controller.set_region("region2");
        assert!(!controller.is_search_pending());
        controller.tick_at(t0 + Duration::from_secs(1));
        assert!(source.calls().is_empty());
    }

    #[test]
    fn test_region_change_clears_available_options() {
        let source = Arc::new(FakeSource::default().with_region("region1", &["a1", "a2"]));
        let (mut controller, _, _) = mount(no_preload(), "region1", &["picked"], &source);
        controller.search("a");
        controller.flush_search();
        controller.settle(SETTLE);
        assert_eq!(controller.available().len(), 2);

        controller.set_region("region2");
        let visible = controller.visible_options("");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].option.value, "picked");
    }

    #[test]
    fn test_preload_on_mount_and_region_change() {
        let source = Arc::new(
            FakeSource::default()
                .with_region("region1", &["log_group_1"])
                .with_region("region2", &["log_group_2"]),
        );
        let (mut controller, _, _) =
            mount(ControllerConfig::default(), "region1", &[], &source);
        assert!(controller.settle(SETTLE).is_empty());
        assert_eq!(values(controller.available()), vec!["log_group_1"]);

        controller.set_region("region2");
        controller.settle(SETTLE);
        assert_eq!(values(controller.available()), vec!["log_group_2"]);

        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.log_group_name_prefix.is_none()));
        assert!(calls
            .iter()
            .all(|c| c.limit == Some(constants::DEFAULT_PRELOAD_LIMIT)));
    }

    #[test]
    fn test_prune_on_region_change_reports_surviving_names() {
        let source = Arc::new(
            FakeSource::default()
                .with_region("region1", &["log_group_1"])
                .with_region("region2", &["log_group_2"]),
        );
        let config = ControllerConfig {
            prune_on_region_change: true,
            ..Default::default()
        };
        let (mut controller, initial, _) = mount(config, "region1", &["log_group_1"], &source);
        assert_eq!(initial.log_group_names, vec!["log_group_1"]);
        assert!(controller.settle(SETTLE).is_empty(), "mount listing never prunes");

        controller.set_region("region2");
        let reports = controller.settle(SETTLE);
        assert_eq!(reports.len(), 1);
        assert!(reports[0].log_group_names.is_empty());
        assert!(controller.selected().is_empty());
    }

    #[test]
    fn test_without_prune_region_change_keeps_selection_silently() {
        let source = Arc::new(
            FakeSource::default()
                .with_region("region1", &["log_group_1"])
                .with_region("region2", &["log_group_2"]),
        );
        let (mut controller, _, _) =
            mount(ControllerConfig::default(), "region1", &["log_group_1"], &source);
        controller.settle(SETTLE);
        controller.set_region("region2");
        assert!(controller.settle(SETTLE).is_empty());
        assert_eq!(values(controller.selected()), vec!["log_group_1"]);
    }

    #[test]
    fn test_prune_checks_names_beyond_the_preload_page() {
        let big: Vec<String> = (0..60).map(|i| format!("g{i:02}")).collect();
        let big: Vec<&str> = big.iter().map(String::as_str).collect();
        let source = Arc::new(
            FakeSource::default()
                .with_region("region1", &["g55", "gone"])
                .with_region("region2", &big),
        );
        let config = ControllerConfig {
            prune_on_region_change: true,
            ..Default::default()
        };
        let (mut controller, _, _) = mount(config, "region1", &["g55", "gone", "$env"], &source);
        controller.settle(SETTLE);

        controller.set_region("region2");
        let reports = controller.settle(SETTLE);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].log_group_names, vec!["g55", "$env"]);
        assert_eq!(controller.available().len(), constants::DEFAULT_PRELOAD_LIMIT);
        assert!(!controller.available().iter().any(|o| o.value == "g55"));

        let lookups: Vec<Option<String>> = source
            .calls()
            .into_iter()
            .filter(|c| c.region == "region2" && c.limit.is_none())
            .map(|c| c.log_group_name_prefix)
            .collect();
        assert_eq!(lookups.len(), 2);
        assert!(lookups.contains(&Some("g55".to_string())));
        assert!(lookups.contains(&Some("gone".to_string())));
    }

    #[test]
    fn test_prune_keeps_selection_when_all_names_exist() {
        let source = Arc::new(
            FakeSource::default()
                .with_region("region1", &["shared"])
                .with_region("region2", &["shared"]),
        );
        let config = ControllerConfig {
            prune_on_region_change: true,
            preload_limit: None,
            ..Default::default()
        };
        let (mut controller, _, _) = mount(config, "region1", &["shared"], &source);
        controller.set_region("region2");
        assert!(controller.settle(SETTLE).is_empty());
        assert_eq!(values(controller.selected()), vec!["shared"]);
    }

    #[test]
    fn test_failed_lookup_keeps_its_name() {
        let source = Arc::new(
            FakeSource::default()
                .with_region("region1", &["log_group_1"])
                .failing_in("region2", RemoteError::from("throttled")),
        );
        let config = ControllerConfig {
            prune_on_region_change: true,
            preload_limit: None,
            ..Default::default()
        };
        let (mut controller, _, center) = mount(config, "region1", &["log_group_1"], &source);
        controller.set_region("region2");

        assert!(controller.settle(SETTLE).is_empty());
        assert_eq!(values(controller.selected()), vec!["log_group_1"]);
        assert_eq!(center.len(), 1);
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_failure_from_previous_region_is_dropped() {
        let source = Arc::new(FakeSource::default().failing_in("region1", RemoteError::from("boom")));
        let (mut controller, _, center) = mount(no_preload(), "region1", &[], &source);
        controller.search("abc");
        controller.flush_search();
        assert!(controller.is_loading());

        controller.set_region("region2");
        assert!(!controller.is_loading(), "old region's request does not count");

        controller.settle(SETTLE);
        assert_eq!(source.calls().len(), 1);
        assert!(center.is_empty());
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_panicking_source_notifies_once() {
        let center = NotificationCenter::new();
        let source: Arc<dyn LogGroupSource> = Arc::new(
            |_: &DescribeLogGroupsRequest| -> Result<Vec<String>, RemoteError> {
                panic!("source exploded")
            },
        );
        let (mut controller, _) = LogGroupSearchController::mount(
            no_preload(),
            "r",
            &[],
            source,
            Box::new(center.clone()),
        );

        controller.search("abc");
        controller.flush_search();
        assert!(controller.settle(SETTLE).is_empty());

        let notes = center.snapshot();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "source exploded");
        assert!(controller.available().is_empty());
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_custom_values_follow_config() {
        let source = Arc::new(FakeSource::default());
        let (mut denied, _, _) = mount(no_preload(), "r", &[], &source);
        assert!(denied.create_custom("mine").is_none());
        assert!(denied.selected().is_empty());

        let config = ControllerConfig {
            allow_custom_value: true,
            ..no_preload()
        };
        let (mut allowed, _, _) = mount(config, "r", &["a"], &source);
        let update = allowed.create_custom("mine").expect("custom value accepted");
        assert_eq!(update.log_group_names, vec!["a", "mine"]);
    }

    #[test]
    fn test_pick_refused_at_cap() {
        let source = Arc::new(FakeSource::default());
        let persisted: Vec<String> = (0..constants::MAX_LOG_GROUPS)
            .map(|i| format!("g{i}"))
            .collect();
        let persisted: Vec<&str> = persisted.iter().map(String::as_str).collect();
        let (mut controller, _, _) = mount(no_preload(), "r", &persisted, &source);

        assert!(controller.is_at_cap());
        assert!(controller.is_option_disabled(&LogGroupOption::from_name("new")));
        assert!(controller.pick(LogGroupOption::from_name("new")).is_none());
        assert_eq!(controller.selected().len(), constants::MAX_LOG_GROUPS);

        // Removing one re-opens the selection.
        assert!(controller.remove("g0").is_some());
        assert!(controller.pick(LogGroupOption::from_name("new")).is_some());
    }

    #[test]
    fn test_menu_open_clears_invalid_flag() {
        let source = Arc::new(FakeSource::default());
        let (mut controller, _, _) = mount(no_preload(), "r", &[], &source);
        controller.mark_invalid();
        assert!(controller.state().invalid);
        controller.on_menu_open();
        assert!(!controller.state().invalid);
    }
}
