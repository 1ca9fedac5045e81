//! Health, schema, and filter-menu endpoints

use axum::extract::{Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::DashboardState;
use crate::api::envelope::ApiResponse;
use crate::filter::{self, Bin};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: usize,
    pub columns: usize,
}

/// GET /api/v1/health
pub async fn health(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        records: state.dataset.len(),
        columns: state.dataset.schema().len(),
    })
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub records: usize,
    pub columns: Vec<String>,
    /// Columns offered by numeric selectors
    pub numeric_columns: Vec<String>,
    pub year_min: i32,
    pub year_max: i32,
}

/// GET /api/v1/schema - Columns the loaded dataset exposes
pub async fn schema(State(state): State<DashboardState>) -> Response {
    let ds = &state.dataset;
    ApiResponse::ok(SchemaResponse {
        records: ds.len(),
        columns: ds.schema().columns().to_vec(),
        numeric_columns: ds.numeric_columns().into_iter().map(str::to_string).collect(),
        year_min: state.config.filters.year_min,
        year_max: state.config.filters.year_max,
    })
}

#[derive(Debug, Deserialize)]
pub struct OptionsQuery {
    pub column: String,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub column: String,
    pub options: Vec<String>,
}

/// GET /api/v1/filters/options?column=Operator - Select-box menu
///
/// An absent column offers only `"All"`.
pub async fn filter_options(
    State(state): State<DashboardState>,
    Query(q): Query<OptionsQuery>,
) -> Response {
    let options = filter::select_options(&state.dataset, &q.column);
    ApiResponse::ok(OptionsResponse {
        column: q.column,
        options,
    })
}

#[derive(Debug, Serialize)]
pub struct BinSetView {
    pub name: String,
    pub column: String,
    /// `"All"` followed by bin labels
    pub options: Vec<String>,
    pub bins: Vec<Bin>,
    /// False when the dataset lacks the bin set's column
    pub available: bool,
}

/// GET /api/v1/filters/bins - Configured range-bucket sets
pub async fn filter_bins(State(state): State<DashboardState>) -> Response {
    let sets: Vec<BinSetView> = state
        .config
        .filters
        .bins
        .iter()
        .map(|set| BinSetView {
            name: set.name.clone(),
            column: set.column.clone(),
            options: set.options(),
            bins: set.bins.clone(),
            available: state.dataset.has_column(&set.column),
        })
        .collect();
    ApiResponse::ok(sets)
}
