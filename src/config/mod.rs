//! Dashboard Configuration Module
//!
//! Data source, server address, filter bin sets, year window, and cost
//! presets loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `PRODIGY_CONFIG` environment variable (path to TOML file)
//! 2. `dashboard_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! // In main():
//! config::init(DashboardConfig::load());
//!
//! // Anywhere else:
//! let bins = &config::get().filters.bins;
//! ```

mod dashboard_config;
pub mod validation;

pub use dashboard_config::*;

use std::sync::OnceLock;

/// Global dashboard configuration, initialized once at startup.
static DASHBOARD_CONFIG: OnceLock<DashboardConfig> = OnceLock::new();

/// Initialize the global dashboard configuration. Later calls are ignored.
pub fn init(config: DashboardConfig) {
    if DASHBOARD_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// The global dashboard configuration. Falls back to built-in defaults if
/// `init()` was never called.
pub fn get() -> &'static DashboardConfig {
    DASHBOARD_CONFIG.get_or_init(|| {
        tracing::warn!("config::get() before config::init(), using built-in defaults");
        DashboardConfig::default()
    })
}
