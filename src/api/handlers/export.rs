//! CSV download endpoint

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::cost::CostPreset;
use super::DashboardState;
use crate::api::envelope::{ApiErrorResponse, ApiJson};
use crate::dataset::export::{self, ExportError};
use crate::filter::CriterionSpec;
use crate::metrics::{advanced, cost};

/// What the download contains.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    /// The filtered records, all columns
    #[default]
    Records,
    /// Per-record CVR, FLI, MRE%
    AdvancedMetrics,
    /// Per-record variable cost lines under a preset
    CostLines,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub filters: Vec<CriterionSpec>,
    #[serde(default)]
    pub kind: ExportKind,
    /// Download name; defaults to `[export].filename`
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub preset: CostPreset,
}

/// POST /api/v1/export - `text/csv` attachment
pub async fn export_csv(
    State(state): State<DashboardState>,
    ApiJson(req): ApiJson<ExportRequest>,
) -> Response {
    let requested = req.filename.as_deref().unwrap_or(&state.config.export.filename);
    let filename = match export::sanitize_filename(requested) {
        Ok(name) => name,
        Err(e) => return ApiErrorResponse::bad_request(e.to_string()),
    };
    let ds = match state.filtered(&req.filters) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };

    let body: Result<String, ExportError> = match req.kind {
        ExportKind::Records => export::dataset_to_csv(&ds),
        ExportKind::AdvancedMetrics => export::table_to_csv(&advanced::record_metrics(&ds)),
        ExportKind::CostLines => match req.preset.configuration(&state.config) {
            Ok(config) => export::table_to_csv(&cost::record_cost_table(&ds, &config)),
            Err(resp) => return resp,
        },
    };

    match body {
        Ok(csv) => {
            tracing::info!(file = %filename, records = ds.len(), kind = ?req.kind, "Export served");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(e) => ApiErrorResponse::internal(format!("Export failed: {e}")),
    }
}
