//! API route handlers
//!
//! One module per dashboard page:
//! - `system`: health, schema, and filter menus
//! - `wells`: multi-well comparison
//! - `sales`: sales analysis
//! - `advanced`: advanced analysis KPIs and distributions
//! - `cost`: cost estimator
//! - `export`: CSV downloads

mod advanced;
mod cost;
mod export;
mod sales;
mod system;
mod wells;

pub use advanced::*;
pub use cost::*;
pub use export::*;
pub use sales::*;
pub use system::*;
pub use wells::*;

use axum::response::Response;
use serde::Deserialize;
use std::sync::Arc;

use super::envelope::ApiErrorResponse;
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::filter::{self, CriterionSpec};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers. The dataset is loaded once and only read.
#[derive(Clone)]
pub struct DashboardState {
    pub dataset: Arc<Dataset>,
    pub config: Arc<DashboardConfig>,
}

impl DashboardState {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            config: Arc::new(config),
        }
    }

    /// The source dataset narrowed by `specs`. Unresolvable descriptors
    /// become a 400 response.
    pub fn filtered(&self, specs: &[CriterionSpec]) -> Result<Dataset, Response> {
        let criteria = filter::resolve(specs, &self.config.filters.bins)
            .map_err(|e| ApiErrorResponse::bad_request(e.to_string()))?;
        Ok(filter::apply(&self.dataset, &criteria))
    }
}

/// Body shared by page endpoints that only need the sidebar state.
#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub filters: Vec<CriterionSpec>,
}


#[cfg(test)]
mod tests {
    use super::test_support::test_state;
    use super::*;

    #[test]
    fn test_filtered_resolves_buckets() {
        let state = test_state();
        let specs = vec![CriterionSpec::Bucket {
            bins: "depth".into(),
            bin: "10000–15000 ft".into(),
        }];
        let ds = state.filtered(&specs).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(state.dataset.len(), 3);
    }

    #[test]
    fn test_filtered_rejects_unknown_bin() {
        let state = test_state();
        let specs = vec![CriterionSpec::Bucket {
            bins: "depth".into(),
            bin: "very deep".into(),
        }];
        let resp = state.filtered(&specs).unwrap_err();
        assert_eq!(resp.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
