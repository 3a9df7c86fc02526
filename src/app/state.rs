// GroupScout - app/state.rs
//
// Application state management. Holds the owner's logs query, the region
// list, and the bookkeeping around query runs.
// Owned by the eframe::App implementation.

use crate::app::notify::NotificationCenter;
use crate::app::session::{self, SessionData};
use crate::core::model::{LogsQuery, QueryUpdate};
use crate::core::search_term::{is_template_variable, is_valid_log_group_name};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Maximum number of regions remembered in the recent list.
const MAX_RECENT_REGIONS: usize = 8;

/// Record of the last time the owner ran its query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRun {
    pub log_group_names: Vec<String>,
    pub ran_at: DateTime<Utc>,
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// The logs query owned by the editor. The selector only ever writes
    /// `log_group_names`, through `apply_query_update`.
    pub query: LogsQuery,

    /// Regions offered in the region picker.
    pub regions: Vec<String>,

    /// Regions switched to, most recent first.
    pub recent_regions: Vec<String>,

    /// Text typed in the log group search box.
    pub search_input: String,

    /// Number of times the query has been run.
    pub run_count: u64,

    /// The most recent run.
    pub last_run: Option<QueryRun>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal startup warnings (config, catalog).
    pub warnings: Vec<String>,

    /// Shared with the selector, which publishes search failures here.
    pub notifications: NotificationCenter,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,

    /// Where the session is saved on exit. `None` disables persistence.
    pub session_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(query: LogsQuery, regions: Vec<String>, debug_mode: bool) -> Self {
        let mut regions = regions;
        if !regions.contains(&query.region) {
            regions.push(query.region.clone());
        }
        Self {
            query,
            regions,
            recent_regions: Vec::new(),
            search_input: String::new(),
            run_count: 0,
            last_run: None,
            status_message: "Ready. Choose log groups to query.".to_string(),
            warnings: Vec::new(),
            notifications: NotificationCenter::new(),
            debug_mode,
            session_path: None,
        }
    }

    /// Restore the non-query parts of a saved session.
    pub fn restore_session(&mut self, data: &SessionData) {
        for region in data.recent_regions.iter().rev() {
            self.remember_region(region);
        }
    }

    /// Persist the query. Failures are logged, never surfaced.
    pub fn save_session(&self) {
        let Some(ref path) = self.session_path else {
            return;
        };
        let mut data = SessionData::new(self.query.clone());
        data.recent_regions = self.recent_regions.clone();
        if let Err(e) = session::save(&data, path) {
            tracing::warn!(error = %e, "Failed to save session");
        }
    }

    /// Merge a selector report into the query and run it.
    ///
    /// Returns false when the run rejected the log groups.
    pub fn apply_query_update(&mut self, update: &QueryUpdate) -> bool {
        self.query.apply(update);
        self.run_query()
    }

    /// Run the query with the current log groups.
    ///
    /// A log group name the service would refuse rejects the whole run:
    /// nothing is recorded and the status bar names the offending entry.
    pub fn run_query(&mut self) -> bool {
        let rejected = self
            .query
            .log_group_names
            .iter()
            .find(|name| !is_template_variable(name) && !is_valid_log_group_name(name));
        if let Some(name) = rejected {
            tracing::warn!(
                ref_id = %self.query.ref_id,
                log_group = %name,
                "Query rejected"
            );
            self.status_message = format!("Query rejected: '{name}' is not a valid log group name.");
            return false;
        }

        self.run_count += 1;
        let names = self.query.log_group_names.clone();
        self.status_message = match names.len() {
            0 => "Query run with no log groups selected.".to_string(),
            1 => format!("Query run against {}.", names[0]),
            n => format!("Query run against {n} log groups."),
        };
        tracing::info!(
            ref_id = %self.query.ref_id,
            region = %self.query.region,
            log_groups = names.len(),
            run = self.run_count,
            "Query run"
        );
        self.last_run = Some(QueryRun {
            log_group_names: names,
            ran_at: Utc::now(),
        });
        true
    }

    /// Point the query at `region` and remember it as recent.
    pub fn set_region(&mut self, region: &str) {
        self.query.region = region.to_string();
        self.remember_region(region);
    }

    /// Move `region` to the front of the recent list.
    pub fn remember_region(&mut self, region: &str) {
        self.recent_regions.retain(|r| r != region);
        self.recent_regions.insert(0, region.to_string());
        self.recent_regions.truncate(MAX_RECENT_REGIONS);
        if !self.regions.iter().any(|r| r == region) {
            self.regions.push(region.to_string());
        }
    }
}
