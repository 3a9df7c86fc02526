// GroupScout - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants::UNKNOWN_ERROR_MESSAGE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Log group options
// =============================================================================

/// A log group name paired with its display label.
///
/// The label is always identical to the value; options are keyed by `value`
/// for every merge and membership check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogGroupOption {
    pub value: String,
    pub label: String,
}

impl LogGroupOption {
    /// Build an option whose label mirrors its value.
    pub fn from_name(name: impl Into<String>) -> Self {
        let value = name.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Transient UI flags for the selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchState {
    /// A remote request is outstanding.
    pub loading: bool,

    /// The owner reported that the current selection was rejected.
    /// Cleared whenever the option menu is opened.
    pub invalid: bool,
}

/// An option as offered by the selection surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub option: LogGroupOption,

    /// Already part of the selected set.
    pub selected: bool,

    /// The surface must not allow picking this option.
    pub disabled: bool,

    /// The option names a dashboard template variable rather than a
    /// concrete log group.
    pub template_variable: bool,
}

// =============================================================================
// Outbound report
// =============================================================================

/// The query fragment reported to the owning query editor whenever the
/// selected set changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUpdate {
    pub log_group_names: Vec<String>,
}

impl QueryUpdate {
    /// Build a report from the selected options, preserving their order.
    pub fn from_selection(selected: &[LogGroupOption]) -> Self {
        Self {
            log_group_names: selected.iter().map(|o| o.value.clone()).collect(),
        }
    }
}

/// The owner's logs query. The controller only ever touches
/// `log_group_names`; the other fields belong to the query editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsQuery {
    pub ref_id: String,
    pub region: String,
    #[serde(default)]
    pub log_group_names: Vec<String>,
    #[serde(default)]
    pub expression: String,
}

impl LogsQuery {
    pub fn new(ref_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            region: region.into(),
            log_group_names: Vec::new(),
            expression: String::new(),
        }
    }

    /// Merge a controller report into this query.
    pub fn apply(&mut self, update: &QueryUpdate) {
        self.log_group_names = update.log_group_names.clone();
    }
}

// =============================================================================
// Remote search
// =============================================================================

/// Parameters of a single remote `describeLogGroups` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeLogGroupsRequest {
    pub ref_id: String,
    pub region: String,

    /// Only names starting with this prefix are returned. `None` lists
    /// from the beginning of the namespace.
    pub log_group_name_prefix: Option<String>,

    /// Maximum number of names to return. `None` leaves the page size to
    /// the service.
    pub limit: Option<usize>,
}

/// Why a request was issued. Determines how its result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Debounced search driven by user input.
    Search,
    /// Unprefixed listing issued at mount.
    InitialLoad,
    /// Unprefixed listing issued after a region change.
    RegionLoad,
    /// Exact-name lookup confirming a selected log group exists in the new
    /// region before the selection is pruned.
    ExistenceCheck,
}

/// Error value returned by a remote source.
///
/// Services may reject with a plain string or with a structured payload;
/// both must be turned into something displayable without failing.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteError {
    Message(String),
    Structured(serde_json::Value),
}

impl RemoteError {
    /// Best-effort display text: the message itself, or the compact JSON of
    /// a structured payload, or a generic fallback when neither is usable.
    pub fn display_message(&self) -> String {
        match self {
            Self::Message(m) if !m.trim().is_empty() => m.clone(),
            Self::Message(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
            Self::Structured(serde_json::Value::Null) => UNKNOWN_ERROR_MESSAGE.to_string(),
            Self::Structured(serde_json::Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Self::Structured(value) => serde_json::to_string(value)
                .unwrap_or_else(|_| UNKNOWN_ERROR_MESSAGE.to_string()),
        }
    }
}

impl From<String> for RemoteError {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for RemoteError {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<serde_json::Value> for RemoteError {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

/// Progress messages sent from a search worker thread to the UI thread.
#[derive(Debug)]
pub enum SearchProgress {
    /// The remote call returned a page of log group names.
    Completed {
        request_id: u64,
        kind: RequestKind,
        request: DescribeLogGroupsRequest,
        names: Vec<String>,
    },

    /// The remote call failed, or the source panicked.
    Failed {
        request_id: u64,
        kind: RequestKind,
        request: DescribeLogGroupsRequest,
        error: RemoteError,
        panicked: bool,
    },
}

impl SearchProgress {
    pub fn request_id(&self) -> u64 {
        match self {
            Self::Completed { request_id, .. } | Self::Failed { request_id, .. } => *request_id,
        }
    }
}

// =============================================================================
// Input events from the selection surface
// =============================================================================

/// What caused the search box text to change.
///
/// Only genuine typing triggers a remote search; text changes caused by the
/// widget itself (value set, blur, menu close) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    InputChange,
    SetValue,
    InputBlur,
    MenuClose,
}

// =============================================================================
// Notifications
// =============================================================================

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Error,
    Warning,
    Info,
}

impl NotificationLevel {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }
}

/// A message for the user, raised by the controller or the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}
