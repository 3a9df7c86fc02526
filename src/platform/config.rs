// GroupScout - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::search_term::is_template_variable;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for GroupScout data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/groupscout/ or %APPDATA%\GroupScout\config\)
    pub config_dir: PathBuf,

    /// Data directory for the session file.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub selector: SelectorSection,
    pub source: SourceSection,
    pub ui: UiSection,
    pub logging: LoggingSection,
}

/// `[selector]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SelectorSection {
    /// Search debounce window in ms.
    pub debounce_ms: Option<u64>,
    /// Names listed at mount and after region changes (0 = disabled).
    pub preload_limit: Option<usize>,
    pub allow_custom_values: Option<bool>,
    pub prune_on_region_change: Option<bool>,
    /// Template variable names offered alongside remote results.
    pub template_variables: Option<Vec<String>>,
}

/// `[source]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SourceSection {
    /// Catalog TOML file replacing the built-in demo catalog.
    pub catalog_file: Option<String>,
    /// Artificial delay added to every catalog request, in ms.
    pub simulated_latency_ms: Option<u64>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Selector --
    pub debounce: Duration,
    /// `None` disables the unprefixed listing.
    pub preload_limit: Option<usize>,
    pub allow_custom_values: bool,
    pub prune_on_region_change: bool,
    pub template_variables: Vec<String>,

    // -- Source --
    pub catalog_file: Option<PathBuf>,
    pub simulated_latency: Duration,

    // -- UI --
    pub dark_mode: bool,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(constants::DEFAULT_SEARCH_DEBOUNCE_MS),
            preload_limit: Some(constants::DEFAULT_PRELOAD_LIMIT),
            allow_custom_values: false,
            prune_on_region_change: false,
            template_variables: Vec::new(),
            catalog_file: None,
            simulated_latency: Duration::ZERO,
            dark_mode: true,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with an error warning; the
/// application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.clone(),
                source: e,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path.clone(),
                source: e,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);
    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Range-check every raw value, accumulating one warning per rejected field.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Selector: debounce_ms --
    if let Some(ms) = raw.selector.debounce_ms {
        if (constants::MIN_SEARCH_DEBOUNCE_MS..=constants::MAX_SEARCH_DEBOUNCE_MS).contains(&ms) {
            config.debounce = Duration::from_millis(ms);
        } else {
            warnings.push(format!(
                "[selector] debounce_ms = {ms} is out of range ({}-{}). Using default ({}).",
                constants::MIN_SEARCH_DEBOUNCE_MS,
                constants::MAX_SEARCH_DEBOUNCE_MS,
                constants::DEFAULT_SEARCH_DEBOUNCE_MS,
            ));
        }
    }

    // -- Selector: preload_limit --
    match raw.selector.preload_limit {
        Some(0) => config.preload_limit = None,
        Some(limit) if limit <= constants::ABSOLUTE_MAX_PRELOAD_LIMIT => {
            config.preload_limit = Some(limit);
        }
        Some(limit) => warnings.push(format!(
            "[selector] preload_limit = {limit} is out of range (0-{}). Using default ({}).",
            constants::ABSOLUTE_MAX_PRELOAD_LIMIT,
            constants::DEFAULT_PRELOAD_LIMIT,
        )),
        None => {}
    }

    if let Some(allow) = raw.selector.allow_custom_values {
        config.allow_custom_values = allow;
    }

    if let Some(prune) = raw.selector.prune_on_region_change {
        config.prune_on_region_change = prune;
    }

    // -- Selector: template_variables --
    if let Some(vars) = raw.selector.template_variables {
        for var in vars {
            if is_template_variable(&var) {
                if !config.template_variables.contains(&var) {
                    config.template_variables.push(var);
                }
            } else {
                warnings.push(format!(
                    "[selector] template_variables entry \"{var}\" is not a template variable \
                     (expected $name, ${{name}} or [[name]]). Ignored.",
                ));
            }
        }
    }

    // -- Source: catalog_file --
    if let Some(ref file) = raw.source.catalog_file {
        if !file.trim().is_empty() {
            config.catalog_file = Some(PathBuf::from(file));
        }
    }

    // -- Source: simulated_latency_ms --
    if let Some(ms) = raw.source.simulated_latency_ms {
        if ms <= constants::MAX_SIMULATED_LATENCY_MS {
            config.simulated_latency = Duration::from_millis(ms);
        } else {
            warnings.push(format!(
                "[source] simulated_latency_ms = {ms} is out of range (0-{}). Using default (0).",
                constants::MAX_SIMULATED_LATENCY_MS,
            ));
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                warnings.push(format!(
                    "[ui] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
                ));
            }
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}
