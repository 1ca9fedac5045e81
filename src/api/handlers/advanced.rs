//! Advanced analysis endpoints

use axum::extract::State;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::{DashboardState, FilterRequest};
use crate::api::envelope::{ApiErrorResponse, ApiJson, ApiResponse};
use crate::dataset::columns;
use crate::filter::CriterionSpec;
use crate::metrics::advanced::{self, GroupDistribution};
use crate::metrics::DerivedMetric;

#[derive(Debug, Serialize)]
pub struct AdvancedMetricsResponse {
    pub records: usize,
    pub kpis: Vec<DerivedMetric>,
}

/// POST /api/v1/advanced/metrics - Nine-card KPI board
pub async fn advanced_metrics(
    State(state): State<DashboardState>,
    ApiJson(req): ApiJson<FilterRequest>,
) -> Response {
    match state.filtered(&req.filters) {
        Ok(ds) => ApiResponse::for_subset(
            AdvancedMetricsResponse {
                records: ds.len(),
                kpis: advanced::advanced_metrics(&ds),
            },
            ds.len(),
            state.dataset.len(),
        ),
        Err(resp) => resp,
    }
}

/// Grouping of the box-plot view.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionGroup {
    #[default]
    Shaker,
    Well,
}

impl DistributionGroup {
    pub fn column(self) -> &'static str {
        match self {
            Self::Shaker => columns::FLOWLINE_SHAKERS,
            Self::Well => columns::WELL_NAME,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DistributionRequest {
    #[serde(default)]
    pub filters: Vec<CriterionSpec>,
    pub metric: String,
    #[serde(default)]
    pub group_by: DistributionGroup,
}

#[derive(Debug, Serialize)]
pub struct DistributionResponse {
    pub metric: String,
    pub group_column: &'static str,
    pub groups: Vec<GroupDistribution>,
}

/// POST /api/v1/advanced/distribution - Per-group five-number summaries
pub async fn advanced_distribution(
    State(state): State<DashboardState>,
    ApiJson(req): ApiJson<DistributionRequest>,
) -> Response {
    if req.metric.trim().is_empty() {
        return ApiErrorResponse::bad_request("metric must not be empty");
    }
    let ds = match state.filtered(&req.filters) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let group_column = req.group_by.column();
    ApiResponse::for_subset(
        DistributionResponse {
            groups: advanced::distribution(&ds, &req.metric, group_column),
            metric: req.metric,
            group_column,
        },
        ds.len(),
        state.dataset.len(),
    )
}
