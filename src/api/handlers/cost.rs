//! Cost estimator endpoints

use axum::extract::State;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::DashboardState;
use crate::api::envelope::{ApiErrorResponse, ApiJson, ApiResponse};
use crate::config::DashboardConfig;
use crate::filter::{self, CriterionSpec};
use crate::metrics::cost::{self, CostBreakdown, CostConfiguration, CostGroup};
use crate::metrics::{normalize, DerivedMetric, NormalizationUnit};

/// Named cost preset from the `[cost.*]` config sections.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostPreset {
    #[default]
    Derrick,
    NonDerrick,
}

impl CostPreset {
    pub fn configuration(self, config: &DashboardConfig) -> Result<CostConfiguration, Response> {
        let result = match self {
            Self::Derrick => config.cost.derrick_config(),
            Self::NonDerrick => config.cost.non_derrick_config(),
        };
        result.map_err(|e| ApiErrorResponse::internal(format!("Invalid cost preset: {e}")))
    }
}

/// Explicit parameters win over a named preset.
fn pick_configuration(
    config: &DashboardConfig,
    explicit: Option<CostConfiguration>,
    preset: CostPreset,
) -> Result<CostConfiguration, Response> {
    match explicit {
        Some(c) => Ok(c),
        None => preset.configuration(config),
    }
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub filters: Vec<CriterionSpec>,
    #[serde(default)]
    pub preset: CostPreset,
    /// Validated on deserialization
    #[serde(default)]
    pub config: Option<CostConfiguration>,
    #[serde(default)]
    pub normalize: Option<NormalizationUnit>,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub breakdown: CostBreakdown,
    pub metrics: Vec<DerivedMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<Vec<DerivedMetric>>,
}

/// POST /api/v1/cost/estimate - Cost breakdown of the filtered wells
pub async fn cost_estimate(
    State(state): State<DashboardState>,
    ApiJson(req): ApiJson<EstimateRequest>,
) -> Response {
    let ds = match state.filtered(&req.filters) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let config = match pick_configuration(&state.config, req.config, req.preset) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let breakdown = cost::estimate(&ds, &config);
    let metrics = breakdown.metrics();
    let normalized = req.normalize.map(|unit| normalize(&metrics, unit, &ds));
    ApiResponse::for_subset(
        EstimateResponse {
            breakdown,
            metrics,
            normalized,
        },
        ds.len(),
        state.dataset.len(),
    )
}

/// One side of a comparison request.
#[derive(Debug, Deserialize)]
pub struct GroupRequest {
    #[serde(default)]
    pub filters: Vec<CriterionSpec>,
    pub config: CostConfiguration,
}

#[derive(Debug, Default, Deserialize)]
pub struct ComparisonRequest {
    /// Applied to both groups before their own filters
    #[serde(default)]
    pub filters: Vec<CriterionSpec>,
    /// Defaults to the Derrick preset over Derrick shakers
    #[serde(default)]
    pub group_a: Option<GroupRequest>,
    /// Defaults to the Non-Derrick preset over Non-Derrick shakers
    #[serde(default)]
    pub group_b: Option<GroupRequest>,
}

fn build_group(
    state: &DashboardState,
    group: Option<GroupRequest>,
    preset: CostPreset,
) -> Result<CostGroup, Response> {
    match group {
        Some(g) => {
            let criteria = filter::resolve(&g.filters, &state.config.filters.bins)
                .map_err(|e| ApiErrorResponse::bad_request(e.to_string()))?;
            Ok(CostGroup::new(criteria, g.config))
        }
        None => Ok(CostGroup::by_shaker(preset.configuration(&state.config)?)),
    }
}

/// POST /api/v1/cost/compare - Two-group comparison, deltas are B − A
pub async fn cost_compare(
    State(state): State<DashboardState>,
    ApiJson(req): ApiJson<ComparisonRequest>,
) -> Response {
    let ds = match state.filtered(&req.filters) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let groups = build_group(&state, req.group_a, CostPreset::Derrick).and_then(|a| {
        build_group(&state, req.group_b, CostPreset::NonDerrick).map(|b| (a, b))
    });
    match groups {
        Ok((a, b)) => {
            ApiResponse::for_subset(cost::compare(&ds, &a, &b), ds.len(), state.dataset.len())
        }
        Err(resp) => resp,
    }
}
