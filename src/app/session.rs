// GroupScout - app/session.rs
//
// Session persistence: save and restore the logs query (region, selected
// log groups, expression) between application restarts.
//
// Design principles:
// - Session is saved atomically (write→temp, rename→final) so a crash
//   during save never corrupts the previous good session.
// - Load errors are discarded; a corrupt or incompatible session just
//   starts the app with an empty query.
// - Remote results are NOT persisted. The selector re-lists the region on
//   restore, so only the query itself needs to survive.

use crate::core::model::LogsQuery;
use crate::util::constants::SESSION_FILE_NAME;
use crate::util::error::{GroupScoutError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp for forward-compatibility checks.
///
/// Version mismatches silently discard the session.
pub const SESSION_VERSION: u32 = 1;

// =============================================================================
// On-disk data structures
// =============================================================================

/// Complete persistent session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Schema version; must equal `SESSION_VERSION` to be accepted.
    pub version: u32,

    /// The logs query as last reported by the selector.
    pub query: LogsQuery,

    /// Regions the user switched to, most recent first. Offered again in the
    /// region picker even when the catalog does not list them.
    #[serde(default)]
    pub recent_regions: Vec<String>,
}

impl SessionData {
    pub fn new(query: LogsQuery) -> Self {
        Self {
            version: SESSION_VERSION,
            query,
            recent_regions: Vec::new(),
        }
    }
}

// =============================================================================
// I/O helpers
// =============================================================================

/// Resolve the session file path from the platform data directory.
pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE_NAME)
}

/// Save `data` to `path` atomically (write temp → rename).
///
/// Creates all parent directories as needed. The caller typically logs the
/// error and moves on.
pub fn save(data: &SessionData, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GroupScoutError::Io {
            path: parent.to_path_buf(),
            operation: "create session directory",
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(data).map_err(|e| GroupScoutError::Io {
        path: path.to_path_buf(),
        operation: "serialise session",
        source: e.into(),
    })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json.as_bytes()).map_err(|e| GroupScoutError::Io {
        path: tmp.clone(),
        operation: "write session temp file",
        source: e,
    })?;

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        GroupScoutError::Io {
            path: path.to_path_buf(),
            operation: "finalise session file",
            source: e,
        }
    })?;

    tracing::debug!(path = %path.display(), "Session saved");
    Ok(())
}

/// Load and validate a `SessionData` from `path`.
///
/// Returns `None` on any error (file not found, JSON parse failure,
/// version mismatch). The caller treats `None` as "start fresh".
pub fn load(path: &Path) -> Option<SessionData> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read session file");
            }
        })
        .ok()?;

    let data: SessionData = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Session file is malformed, starting fresh"
            );
        })
        .ok()?;

    if data.version != SESSION_VERSION {
        tracing::warn!(
            found = data.version,
            expected = SESSION_VERSION,
            "Session file version mismatch, starting fresh"
        );
        return None;
    }

    tracing::info!(
        path = %path.display(),
        region = %data.query.region,
        log_groups = data.query.log_group_names.len(),
        "Session file loaded"
    );
    Some(data)
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_data() -> SessionData {
        let mut query = LogsQuery::new("A", "eu-west-1");
        query.log_group_names = vec!["/aws/lambda/orders".to_string(), "$env".to_string()];
        query.expression = "fields @timestamp, @message".to_string();
        let mut data = SessionData::new(query);
        data.recent_regions = vec!["eu-west-1".to_string(), "us-east-1".to_string()];
        data
    }

    #[test]
    fn test_session_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let original = sample_data();

        save(&original, &path).expect("save should succeed");
        let loaded = load(&path).expect("load should return Some after valid save");
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_session_load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("nonexistent.json")).is_none());
    }

    #[test]
    fn test_session_load_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not valid json {{{{").unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn test_session_load_wrong_version_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut data = sample_data();
        data.version = 99;
        save(&data, &path).unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn test_session_save_reports_io_context() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let err = save(&sample_data(), &blocker.join("session.json")).unwrap_err();
        match err {
            GroupScoutError::Io { ref path, operation, .. } => {
                assert_eq!(path, &blocker);
                assert_eq!(operation, "create session directory");
            }
            ref other => panic!("expected Io error, got {other:?}"),
        }
        assert!(err.to_string().contains("create session directory"));
    }

    /// Older sessions without optional fields still load.
    #[test]
    fn test_session_missing_optional_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            br#"{"version":1,"query":{"ref_id":"A","region":"us-east-1"}}"#,
        )
        .unwrap();
        let loaded = load(&path).unwrap();
        assert!(loaded.query.log_group_names.is_empty());
        assert!(loaded.query.expression.is_empty());
        assert!(loaded.recent_regions.is_empty());
    }

    #[test]
    fn test_session_save_over_leftover_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        save(&sample_data(), &path).unwrap();

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, b"garbage").unwrap();

        let mut updated = sample_data();
        updated.query.region = "ap-south-1".to_string();
        save(&updated, &path).unwrap();

        assert_eq!(load(&path).unwrap().query.region, "ap-south-1");
        assert!(!tmp.exists());
    }
}
