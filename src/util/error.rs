// GroupScout - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation: every error keeps its cause so it can be
// logged with full context.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all GroupScout operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum GroupScoutError {
    /// Log group catalog loading or validation failed.
    Catalog(CatalogError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// A remote log group search failed.
    Search(SearchError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for GroupScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(e) => write!(f, "Catalog error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Search(e) => write!(f, "Search error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for GroupScoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Search(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

/// Errors related to loading a log group catalog from disk.
#[derive(Debug)]
pub enum CatalogError {
    /// TOML file could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Catalog file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A log group name contains characters the remote service rejects,
    /// or is longer than the service allows.
    InvalidLogGroupName { region: String, name: String },

    /// The catalog defines no regions at all.
    EmptyCatalog { path: PathBuf },

    /// I/O error reading the catalog file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse TOML '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Catalog '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::InvalidLogGroupName { region, name } => {
                write!(f, "Region '{region}': invalid log group name '{name}'")
            }
            Self::EmptyCatalog { path } => {
                write!(f, "Catalog '{}' does not define any regions", path.display())
            }
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading catalog '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<CatalogError> for GroupScoutError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for GroupScoutError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Search errors
// ---------------------------------------------------------------------------

/// Errors produced while searching the remote log group namespace.
///
/// These never escape the controller: they are logged and converted into a
/// user notification carrying the same message.
#[derive(Debug)]
pub enum SearchError {
    /// The remote service rejected or failed the request.
    Remote {
        region: String,
        prefix: Option<String>,
        message: String,
    },

    /// The source panicked while serving the request.
    WorkerPanicked { region: String, message: String },
}

impl SearchError {
    /// The message shown to the user, without the request context.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Remote { message, .. } => message,
            Self::WorkerPanicked { message, .. } => message,
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote {
                region,
                prefix: Some(prefix),
                message,
            } => write!(
                f,
                "Log group search for '{prefix}' in region '{region}' failed: {message}"
            ),
            Self::Remote {
                region,
                prefix: None,
                message,
            } => write!(f, "Log group listing in region '{region}' failed: {message}"),
            Self::WorkerPanicked { region, message } => write!(
                f,
                "Log group search worker for region '{region}' panicked: {message}"
            ),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<SearchError> for GroupScoutError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}

/// Convenience type alias for GroupScout results.
pub type Result<T> = std::result::Result<T, GroupScoutError>;
