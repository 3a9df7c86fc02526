// GroupScout - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation (debug mode support)
// 3. Catalog loading (configured file or the built-in demo catalog)
// 4. Session restore and selector mount
// 5. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use groupscout::app;

pub use groupscout::core;
pub use groupscout::platform;
pub use groupscout::ui;
pub use groupscout::util;

use crate::app::controller::{ControllerConfig, LogGroupSearchController};
use crate::app::session;
use crate::app::source::LogGroupSource;
use crate::app::state::AppState;
use crate::core::model::LogsQuery;
use crate::platform::catalog::{Catalog, CatalogSource};
use crate::platform::config::AppConfig;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// GroupScout - search and select log groups for a logs query.
///
/// Log group names are served from a region catalog; pick up to 20 of them
/// for the query and the selection is reported to the query as you go.
#[derive(Parser, Debug)]
#[command(name = "GroupScout", version, about)]
struct Cli {
    /// Region to query (overrides the restored session).
    #[arg(short = 'r', long = "region")]
    region: Option<String>,

    /// Log group to preselect. Repeat for several.
    #[arg(short = 'g', long = "log-group")]
    log_groups: Vec<String>,

    /// Catalog TOML file (overrides [source] catalog_file).
    #[arg(short = 'c', long = "catalog")]
    catalog: Option<PathBuf>,

    /// Allow log group names that are not in the catalog.
    #[arg(long = "allow-custom")]
    allow_custom: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Load the catalog named on the CLI or in config, falling back to the
/// built-in one. Load failures become startup warnings.
fn load_catalog(path: Option<&Path>, warnings: &mut Vec<String>) -> Catalog {
    let Some(path) = path else {
        return Catalog::builtin();
    };
    match Catalog::load(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog load failed; using built-in catalog");
            warnings.push(format!("{e}. Using the built-in catalog."));
            Catalog::builtin()
        }
    }
}

fn controller_config(config: &AppConfig, cli: &Cli, ref_id: &str) -> ControllerConfig {
    ControllerConfig {
        ref_id: ref_id.to_string(),
        allow_custom_value: cli.allow_custom || config.allow_custom_values,
        debounce: config.debounce,
        preload_limit: config.preload_limit,
        prune_on_region_change: config.prune_on_region_change,
        template_variables: config.template_variables.clone(),
    }
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging so its [logging] level can apply.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, mut warnings) = platform::config::load_config(&platform_paths.config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "GroupScout starting"
    );
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let catalog_path = cli.catalog.clone().or_else(|| config.catalog_file.clone());
    let catalog = load_catalog(catalog_path.as_deref(), &mut warnings);

    // Restore the last query, then apply CLI overrides.
    let session_path = session::session_path(&platform_paths.data_dir);
    let restored = session::load(&session_path);
    let mut query = restored.as_ref().map(|s| s.query.clone()).unwrap_or_else(|| {
        LogsQuery::new(
            util::constants::DEFAULT_REF_ID,
            util::constants::DEFAULT_REGION,
        )
    });
    if let Some(ref region) = cli.region {
        query.region = region.clone();
    }
    if !cli.log_groups.is_empty() {
        query.log_group_names = cli.log_groups.clone();
    }

    let mut state = AppState::new(query, catalog.regions(), cli.debug);
    if let Some(ref data) = restored {
        state.restore_session(data);
    }
    state.warnings = warnings;
    state.session_path = Some(session_path);

    let source: Arc<dyn LogGroupSource> =
        Arc::new(CatalogSource::new(catalog).with_latency(config.simulated_latency));
    let (mut selector, initial) = LogGroupSearchController::mount(
        controller_config(&config, &cli, &state.query.ref_id),
        state.query.region.clone(),
        &state.query.log_group_names,
        source,
        Box::new(state.notifications.clone()),
    );
    if !state.apply_query_update(&initial) {
        selector.mark_invalid();
    }

    tracing::info!(
        region = %state.query.region,
        log_groups = state.query.log_group_names.len(),
        "Ready to launch GUI"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let dark_mode = config.dark_mode;
    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, dark_mode);
            Ok(Box::new(gui::GroupScoutApp::new(state, selector)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch GroupScout GUI: {e}");
        std::process::exit(1);
    }
}
