//! Prodigy IQ: Drilling Solids Control & Fluids Reporting Engine
//!
//! Filter-and-aggregate engine behind the drilling dashboard pages
//! (Multi-Well Comparison, Sales Analysis, Advanced Analysis, Cost
//! Estimator).
//!
//! ## Architecture
//!
//! - **Dataset**: immutable schema-aware table loaded once from CSV
//! - **Filter Engine**: equality, multi-select, range-bucket, year, and search criteria
//! - **Metric Engine**: summary and advanced KPIs, cost roll-ups, page aggregates
//! - **API**: Axum JSON service exposing each page computation

pub mod api;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod metrics;

// Re-export dashboard configuration
pub use config::DashboardConfig;

// Re-export the core pipeline types
pub use dataset::{Dataset, DatasetError, LoadConfig, LoadSummary, MetricTable};
pub use filter::{BinSet, CriterionSpec, FilterCriterion, FilterEngine, FilterError};
pub use metrics::cost::{CostBreakdown, CostConfigError, CostConfiguration, CostParameters};
pub use metrics::{safe_div, DerivedMetric, NormalizationUnit, Sign, SignedDelta};
