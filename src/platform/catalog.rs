// GroupScout - platform/catalog.rs
//
// File-backed log group namespace: a TOML catalog mapping each region to the
// log group names it contains, served through `LogGroupSource`.
//
// Catalog format:
//
//   [regions]
//   "us-east-1" = ["/aws/lambda/orders", "/aws/ecs/checkout"]
//   "eu-west-1" = ["vpc-flow-logs"]
//
// Names are validated against the character class the remote service
// accepts. Listing order within a region is the order in the file.

use crate::app::source::LogGroupSource;
use crate::core::model::{DescribeLogGroupsRequest, RemoteError};
use crate::core::search_term::is_valid_log_group_name;
use crate::util::constants;
use crate::util::error::CatalogError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Catalog shipped in the binary, used when no catalog file is configured.
const DEMO_CATALOG: &str = include_str!("../../catalogs/demo.toml");

/// Raw TOML shape of a catalog file.
#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    regions: BTreeMap<String, Vec<String>>,
}

/// Validated region → log group names mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    regions: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// Parse and validate catalog TOML. `source_path` is used for error
    /// messages only.
    pub fn parse(content: &str, source_path: &Path) -> Result<Self, CatalogError> {
        let raw: RawCatalog = toml::from_str(content).map_err(|e| CatalogError::TomlParse {
            path: source_path.to_path_buf(),
            source: e,
        })?;

        if raw.regions.is_empty() {
            return Err(CatalogError::EmptyCatalog {
                path: source_path.to_path_buf(),
            });
        }

        let mut regions = BTreeMap::new();
        for (region, names) in raw.regions {
            let mut seen = HashSet::new();
            let mut unique = Vec::with_capacity(names.len());
            for name in names {
                if !is_valid_log_group_name(&name) {
                    return Err(CatalogError::InvalidLogGroupName { region, name });
                }
                if seen.insert(name.clone()) {
                    unique.push(name);
                } else {
                    tracing::debug!(%region, %name, "Duplicate catalog entry skipped");
                }
            }
            regions.insert(region, unique);
        }

        Ok(Self { regions })
    }

    /// Read, size-check and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let metadata = std::fs::metadata(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if metadata.len() > constants::MAX_CATALOG_FILE_SIZE {
            return Err(CatalogError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                max_size: constants::MAX_CATALOG_FILE_SIZE,
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let catalog = Self::parse(&content, path)?;

        tracing::info!(
            path = %path.display(),
            regions = catalog.regions.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// The demo catalog embedded at compile time.
    ///
    /// A broken embedded catalog is a bug, but the app still starts with an
    /// empty namespace rather than refusing to launch.
    pub fn builtin() -> Self {
        match Self::parse(DEMO_CATALOG, &PathBuf::from("<builtin>/demo.toml")) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load built-in catalog");
                Self::default()
            }
        }
    }

    /// Region names, sorted.
    pub fn regions(&self) -> Vec<String> {
        self.regions.keys().cloned().collect()
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    pub fn log_groups(&self, region: &str) -> Option<&[String]> {
        self.regions.get(region).map(Vec::as_slice)
    }

    /// Answer one `describe_log_groups` call.
    ///
    /// Matches come back in name order, one page at a time, so an exact name
    /// always leads the page for its own prefix. Unknown regions fail with a structured error, the way the remote
    /// service rejects them.
    pub fn describe(&self, request: &DescribeLogGroupsRequest) -> Result<Vec<String>, RemoteError> {
        let names = self.regions.get(&request.region).ok_or_else(|| {
            RemoteError::Structured(serde_json::json!({
                "code": "ResourceNotFoundException",
                "message": format!("Region '{}' is not available", request.region),
                "region": request.region,
            }))
        })?;

        let prefix = request.log_group_name_prefix.as_deref().unwrap_or("");
        let limit = request
            .limit
            .unwrap_or(constants::DEFAULT_SERVICE_PAGE_SIZE);

        let mut matches: Vec<&String> = names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .collect();
        matches.sort();
        Ok(matches.into_iter().take(limit).cloned().collect())
    }
}

/// `LogGroupSource` serving a [`Catalog`], optionally slowed down to make
/// loading states visible.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    catalog: Catalog,
    latency: Duration,
}

impl CatalogSource {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl LogGroupSource for CatalogSource {
    fn describe_log_groups(
        &self,
        request: &DescribeLogGroupsRequest,
    ) -> Result<Vec<String>, RemoteError> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        self.catalog.describe(request)
    }
}
