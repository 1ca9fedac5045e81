//! Dashboard Configuration - data source, filters, and cost presets as TOML
//!
//! Every section implements `Default`, so an empty or partial file is valid
//! and unspecified values keep the built-in dashboard behavior.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::dataset::export::sanitize_filename;
use crate::dataset::LoadConfig;
use crate::filter::BinSet;
use crate::metrics::cost::{CostConfigError, CostConfiguration, CostParameters};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "PRODIGY_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "dashboard_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration of a dashboard deployment.
///
/// Load with `DashboardConfig::load()` which searches:
/// 1. `$PRODIGY_CONFIG` env var
/// 2. `./dashboard_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Source dataset
    #[serde(default)]
    pub data: DataConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Filter widgets: year window and bin sets
    #[serde(default)]
    pub filters: FilterConfig,

    /// Cost Estimator presets
    #[serde(default)]
    pub cost: CostPresets,

    /// Download defaults
    #[serde(default)]
    pub export: ExportConfig,
}

impl DashboardConfig {
    /// Load configuration using the standard search order, logging and
    /// skipping any candidate that fails to load.
    pub fn load() -> Self {
        // 1. Env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded dashboard config from {CONFIG_ENV_VAR}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV_VAR} points to non-existent file, falling back");
            }
        }

        // 2. Working directory
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded dashboard config from ./{LOCAL_CONFIG_FILE}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{LOCAL_CONFIG_FILE}, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents, path)
    }

    /// Parse TOML text. `origin` only labels errors.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        // Two-pass: unknown keys first (warnings only)
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(origin.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration as a complete TOML document, every preset field
    /// spelled out.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write [`to_toml`](Self::to_toml) to `path`, replacing any existing file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Dashboard config saved");
        Ok(())
    }

    /// Validate all sections for internal consistency.
    ///
    /// Rules:
    /// - Delimiter is a single ASCII character; the server address parses
    /// - Year window is ordered
    /// - Bin sets are contiguous partitions with unique names
    /// - Cost presets are finite and non-negative
    /// - The default export filename is a bare file name
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.data.csv_path.trim().is_empty() {
            errors.push("data.csv_path must not be empty".to_string());
        }
        if self.data.delimiter_byte().is_none() {
            errors.push(format!(
                "data.delimiter must be a single ASCII character, got '{}'",
                self.data.delimiter
            ));
        }

        if self.server.addr.parse::<SocketAddr>().is_err() {
            errors.push(format!(
                "server.addr '{}' is not a valid socket address",
                self.server.addr
            ));
        }

        let f = &self.filters;
        if f.year_min > f.year_max {
            errors.push(format!(
                "filters.year_min ({}) must be <= filters.year_max ({})",
                f.year_min, f.year_max
            ));
        }
        let mut seen = HashSet::new();
        for set in &f.bins {
            if !seen.insert(set.name.as_str()) {
                errors.push(format!("filters.bins: duplicate bin set '{}'", set.name));
            }
            errors.extend(set.validate().into_iter().map(|e| format!("filters.bins: {e}")));
        }

        for (section, params) in [("cost.derrick", &self.cost.derrick), ("cost.non_derrick", &self.cost.non_derrick)] {
            if let Err(e) = CostConfiguration::new(params.clone()) {
                errors.push(format!("{section}: {e}"));
            }
        }

        if let Err(e) = sanitize_filename(&self.export.filename) {
            errors.push(format!("export.filename: {e}"));
        }

        let (range_errors, range_warnings) = super::validation::validate_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Data Source
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Delimited-text dataset loaded at startup. Overridden by `--csv`.
    #[serde(default = "default_csv_path")]
    pub csv_path: String,

    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Drop rows whose cells are all empty
    #[serde(default = "default_skip_blank_rows")]
    pub skip_blank_rows: bool,
}

fn default_csv_path() -> String {
    "data/drilling_data.csv".to_string()
}
fn default_delimiter() -> String {
    ",".to_string()
}
fn default_skip_blank_rows() -> bool {
    true
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            delimiter: default_delimiter(),
            skip_blank_rows: default_skip_blank_rows(),
        }
    }
}

impl DataConfig {
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Some(*b),
            _ => None,
        }
    }

    /// Loader settings; an invalid delimiter falls back to `,`.
    pub fn load_config(&self) -> LoadConfig {
        LoadConfig {
            delimiter: self.delimiter_byte().unwrap_or(b','),
            skip_blank_rows: self.skip_blank_rows,
        }
    }
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP bind address. Overridden by `PRODIGY_SERVER_ADDR` or `--addr`.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Sidebar filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Lower bound of the completion-year slider
    #[serde(default = "default_year_min")]
    pub year_min: i32,

    /// Upper bound of the completion-year slider
    #[serde(default = "default_year_max")]
    pub year_max: i32,

    /// Range-bucket sets addressable by name from filter descriptors
    #[serde(default = "default_bin_sets")]
    pub bins: Vec<BinSet>,
}

fn default_year_min() -> i32 {
    2020
}
fn default_year_max() -> i32 {
    2026
}
fn default_bin_sets() -> Vec<BinSet> {
    vec![BinSet::depth(), BinSet::mud_weight()]
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            year_min: default_year_min(),
            year_max: default_year_max(),
            bins: default_bin_sets(),
        }
    }
}

// ============================================================================
// Cost Presets
// ============================================================================

/// Parameters of the two Cost Estimator columns. A section given in TOML
/// must list every parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostPresets {
    #[serde(default = "CostParameters::derrick")]
    pub derrick: CostParameters,

    #[serde(default = "CostParameters::non_derrick")]
    pub non_derrick: CostParameters,
}

impl Default for CostPresets {
    fn default() -> Self {
        Self {
            derrick: CostParameters::derrick(),
            non_derrick: CostParameters::non_derrick(),
        }
    }
}

impl CostPresets {
    pub fn derrick_config(&self) -> Result<CostConfiguration, CostConfigError> {
        CostConfiguration::new(self.derrick.clone())
    }

    pub fn non_derrick_config(&self) -> Result<CostConfiguration, CostConfigError> {
        CostConfiguration::new(self.non_derrick.clone())
    }
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Download name used when the caller does not choose one
    #[serde(default = "default_export_filename")]
    pub filename: String,

    /// Directory the CLI writes exports into
    #[serde(default = "default_export_directory")]
    pub directory: String,
}

fn default_export_filename() -> String {
    "filtered_data.csv".to_string()
}
fn default_export_directory() -> String {
    ".".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: default_export_filename(),
            directory: default_export_directory(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
