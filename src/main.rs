//! Prodigy IQ - drilling dashboard engine
//!
//! Loads one drilling-operations CSV and serves the dashboard computations
//! over HTTP, or runs them once from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Serve the JSON API (default subcommand)
//! prodigy-iq --csv "Refine Sample.csv" serve --addr 127.0.0.1:8080
//!
//! # KPI summary of Apex wells completed 2021-2022
//! prodigy-iq summary --operator Apex --year-from 2021 --year-to 2022
//!
//! # Download records mentioning "derrick"
//! prodigy-iq export --search derrick --out derrick_wells.csv
//!
//! # Per-record cost lines for 2023 completions
//! prodigy-iq export --kind cost-lines --year-from 2023 --year-to 2023
//!
//! # Derrick vs Non-Derrick cost comparison
//! prodigy-iq cost
//!
//! # Write the effective configuration as a starting dashboard_config.toml
//! prodigy-iq config --out dashboard_config.toml
//! ```
//!
//! # Environment Variables
//!
//! - `PRODIGY_CONFIG`: Path to dashboard_config.toml
//! - `PRODIGY_CSV`: Dataset path (same as `--csv`)
//! - `PRODIGY_SERVER_ADDR`: Bind address (same as `serve --addr`)
//! - `PRODIGY_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use prodigy_iq::api::{create_app, DashboardState};
use prodigy_iq::config::{self, DashboardConfig};
use prodigy_iq::dataset::{columns, export, Dataset};
use prodigy_iq::filter::{FilterCriterion, FilterEngine};
use prodigy_iq::metrics::cost::{self, CostGroup};
use prodigy_iq::metrics::{advanced, summary, DerivedMetric};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "prodigy-iq")]
#[command(about = "Prodigy IQ drilling dashboard engine")]
#[command(version)]
struct CliArgs {
    /// Dataset CSV (overrides [data].csv_path)
    #[arg(long, global = true, env = "PRODIGY_CSV")]
    csv: Option<PathBuf>,

    /// Dashboard config TOML (default: $PRODIGY_CONFIG, then ./dashboard_config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Serve the dashboard JSON API
    Serve {
        /// Override the server address (default: [server].addr)
        #[arg(short, long, env = "PRODIGY_SERVER_ADDR")]
        addr: Option<String>,
    },

    /// Print the Multi-Well and Advanced KPIs for a filtered subset
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Write the filtered records to CSV
    Export {
        /// Output file (default: [export].directory/[export].filename)
        #[arg(long)]
        out: Option<PathBuf>,

        /// What to write
        #[arg(long, value_enum, default_value_t = ExportKind::Records)]
        kind: ExportKind,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Compare the Derrick and Non-Derrick cost presets
    Cost,

    /// Print the effective configuration as TOML
    Config {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ExportKind {
    /// Filtered records, all columns
    Records,
    /// Per-record CVR, FLI, MRE%
    AdvancedMetrics,
    /// Per-record variable cost under the Derrick preset
    CostLines,
}

/// Sidebar filters available from the command line.
#[derive(clap::Args, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive text search across all columns
    #[arg(long)]
    search: Option<String>,

    /// Operator to keep ("All" keeps every operator)
    #[arg(long)]
    operator: Option<String>,

    /// First completion year (default: [filters].year_min)
    #[arg(long)]
    year_from: Option<i32>,

    /// Last completion year (default: [filters].year_max)
    #[arg(long)]
    year_to: Option<i32>,
}

impl FilterArgs {
    fn engine(&self, config: &DashboardConfig) -> Result<FilterEngine> {
        let mut engine = FilterEngine::default();
        if let Some(search) = &self.search {
            engine = engine.with(FilterCriterion::search(search.trim()));
        }
        if let Some(operator) = &self.operator {
            engine = engine.with(FilterCriterion::equals(columns::OPERATOR, operator));
        }
        if self.year_from.is_some() || self.year_to.is_some() {
            let start = self.year_from.unwrap_or(config.filters.year_min);
            let end = self.year_to.unwrap_or(config.filters.year_max);
            if start > end {
                bail!("--year-from {start} is after --year-to {end}");
            }
            engine = engine.with(FilterCriterion::year_range(columns::TD_DATE, start, end));
        }
        Ok(engine)
    }
}

// ============================================================================
// Startup
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(p) => DashboardConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(DashboardConfig::load()),
    }
}

fn load_dataset(config: &DashboardConfig, csv_override: Option<&Path>) -> Result<Dataset> {
    let path = csv_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.data.csv_path));

    let (dataset, load_summary) = Dataset::load(&path, &config.data.load_config())
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;

    if !load_summary.missing_core_columns.is_empty() {
        warn!(
            file = %path.display(),
            missing = ?load_summary.missing_core_columns,
            "Dataset lacks some core columns; dependent metrics will read as zero"
        );
    }
    Ok(dataset)
}

fn print_metrics(title: &str, metrics: &[DerivedMetric]) {
    println!("{title}");
    for m in metrics {
        println!("  {:<20} {:>14}", m.label, m.display());
    }
}

// ============================================================================
// Subcommands
// ============================================================================

async fn run_server(dataset: Dataset, config: DashboardConfig, addr: String) -> Result<()> {
    let records = dataset.len();
    let app = create_app(DashboardState::new(dataset, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(addr = %addr, records, "HTTP server listening");

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    info!("Graceful shutdown complete");
    Ok(())
}

fn run_summary(dataset: &Dataset, config: &DashboardConfig, filters: &FilterArgs) -> Result<()> {
    let subset = filters.engine(config)?.apply(dataset);
    println!("Records: {} of {}", subset.len(), dataset.len());
    print_metrics("Multi-Well KPIs", &summary::well_summary(&subset));
    print_metrics("Advanced KPIs", &advanced::advanced_metrics(&subset));
    Ok(())
}

fn run_export(
    dataset: &Dataset,
    config: &DashboardConfig,
    out: Option<&Path>,
    kind: ExportKind,
    filters: &FilterArgs,
) -> Result<()> {
    let subset = filters.engine(config)?.apply(dataset);

    let (dir, filename) = match out {
        Some(p) => {
            let name = p
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("Invalid output path {}", p.display()))?;
            let dir = p.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
            (dir.to_path_buf(), name.to_string())
        }
        None => (PathBuf::from(&config.export.directory), config.export.filename.clone()),
    };

    let written = match kind {
        ExportKind::Records => export::export_dataset(&subset, &dir, &filename),
        ExportKind::AdvancedMetrics => {
            export::export_table(&advanced::record_metrics(&subset), &dir, &filename)
        }
        ExportKind::CostLines => {
            let preset = config
                .cost
                .derrick_config()
                .context("Invalid [cost.derrick]")?;
            export::export_table(&cost::record_cost_table(&subset, &preset), &dir, &filename)
        }
    };
    let path = written
        .with_context(|| format!("Failed to export to {}", dir.join(&filename).display()))?;
    println!("Wrote {} records to {}", subset.len(), path.display());
    Ok(())
}

fn run_config(config: &DashboardConfig, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            config
                .save_to_file(path)
                .with_context(|| format!("Failed to write config {}", path.display()))?;
            println!("Wrote configuration to {}", path.display());
        }
        None => print!("{}", config.to_toml().context("Failed to serialize config")?),
    }
    Ok(())
}

fn run_cost(dataset: &Dataset, config: &DashboardConfig) -> Result<()> {
    let a = CostGroup::by_shaker(config.cost.derrick_config().context("Invalid [cost.derrick]")?);
    let b = CostGroup::by_shaker(
        config
            .cost
            .non_derrick_config()
            .context("Invalid [cost.non_derrick]")?,
    );
    let comparison = cost::compare(dataset, &a, &b);

    for breakdown in [&comparison.group_a, &comparison.group_b] {
        print_metrics(
            &format!("{} ({} records)", breakdown.name, breakdown.records),
            &breakdown.metrics(),
        );
    }
    println!(
        "Total cost delta ({} - {}): {:.2} ({:?})",
        comparison.group_b.name,
        comparison.group_a.name,
        comparison.total_cost_delta.value,
        comparison.total_cost_delta.sign
    );
    println!(
        "Cost per ft delta: {:.2} ({:?})",
        comparison.cost_per_ft_delta.value, comparison.cost_per_ft_delta.sign
    );
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    config::init(load_config(args.config.as_deref())?);
    let dashboard_config = config::get();

    let csv = args.csv.as_deref();
    let dataset = || load_dataset(dashboard_config, csv);

    match args.command.unwrap_or(SubCommand::Serve { addr: None }) {
        SubCommand::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| dashboard_config.server.addr.clone());
            run_server(dataset()?, dashboard_config.clone(), addr).await
        }
        SubCommand::Summary { filters } => run_summary(&dataset()?, dashboard_config, &filters),
        SubCommand::Export { out, kind, filters } => {
            run_export(&dataset()?, dashboard_config, out.as_deref(), kind, &filters)
        }
        SubCommand::Cost => run_cost(&dataset()?, dashboard_config),
        SubCommand::Config { out } => run_config(dashboard_config, out.as_deref()),
    }
}
