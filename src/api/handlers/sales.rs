//! Sales analysis endpoint

use axum::extract::State;
use axum::response::Response;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::DashboardState;
use crate::api::envelope::{ApiJson, ApiResponse};
use crate::filter::CriterionSpec;
use crate::metrics::sales;

#[derive(Debug, Default, Deserialize)]
pub struct SalesRequest {
    #[serde(default)]
    pub filters: Vec<CriterionSpec>,
    /// Month/year the period counts are relative to; defaults to today (UTC)
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

/// POST /api/v1/sales/summary - Period counts, shaker distribution,
/// regional table, and metric trends
pub async fn sales_summary(
    State(state): State<DashboardState>,
    ApiJson(req): ApiJson<SalesRequest>,
) -> Response {
    let ds = match state.filtered(&req.filters) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let reference = req.reference_date.unwrap_or_else(|| Utc::now().date_naive());
    ApiResponse::for_subset(
        sales::sales_summary(&ds, reference),
        ds.len(),
        state.dataset.len(),
    )
}
