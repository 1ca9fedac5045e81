//! Multi-well comparison endpoints

use axum::extract::State;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::{DashboardState, FilterRequest};
use crate::api::envelope::{ApiJson, ApiResponse};
use crate::filter::CriterionSpec;
use crate::metrics::summary::{self, WellValue};
use crate::metrics::DerivedMetric;

#[derive(Debug, Serialize)]
pub struct WellSummaryResponse {
    pub records: usize,
    pub kpis: Vec<DerivedMetric>,
    /// Parameters the comparison selector can offer for this dataset
    pub parameters: Vec<&'static str>,
}

/// POST /api/v1/wells/summary - KPI row over the filtered wells
pub async fn wells_summary(
    State(state): State<DashboardState>,
    ApiJson(req): ApiJson<FilterRequest>,
) -> Response {
    let ds = match state.filtered(&req.filters) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let records = ds.len();
    ApiResponse::for_subset(
        WellSummaryResponse {
            records,
            kpis: summary::well_summary(&ds),
            parameters: summary::available_parameters(&ds),
        },
        records,
        state.dataset.len(),
    )
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub filters: Vec<CriterionSpec>,
    pub parameter: String,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub parameter: String,
    pub wells: Vec<WellValue>,
}

/// POST /api/v1/wells/compare - Per-well values of one parameter
pub async fn wells_compare(
    State(state): State<DashboardState>,
    ApiJson(req): ApiJson<CompareRequest>,
) -> Response {
    let ds = match state.filtered(&req.filters) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let wells = summary::compare_parameter(&ds, &req.parameter);
    ApiResponse::for_subset(
        CompareResponse {
            parameter: req.parameter,
            wells,
        },
        ds.len(),
        state.dataset.len(),
    )
}

/// POST /api/v1/wells/locations - Mappable wells
pub async fn wells_locations(
    State(state): State<DashboardState>,
    ApiJson(req): ApiJson<FilterRequest>,
) -> Response {
    match state.filtered(&req.filters) {
        Ok(ds) => ApiResponse::for_subset(
            summary::well_locations(&ds),
            ds.len(),
            state.dataset.len(),
        ),
        Err(resp) => resp,
    }
}
