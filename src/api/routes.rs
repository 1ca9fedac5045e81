//! API route definitions
//!
//! - /api/v1/health, /schema, /filters/* - dataset and sidebar metadata
//! - /api/v1/wells/* - Multi-Well Comparison page
//! - /api/v1/sales/summary - Sales Analysis page
//! - /api/v1/advanced/* - Advanced Analysis page
//! - /api/v1/cost/* - Cost Estimator page
//! - /api/v1/export - CSV downloads

use axum::{routing::{get, post}, Router};

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/schema", get(handlers::schema))
        .route("/filters/options", get(handlers::filter_options))
        .route("/filters/bins", get(handlers::filter_bins))
        // Multi-Well Comparison
        .route("/wells/summary", post(handlers::wells_summary))
        .route("/wells/compare", post(handlers::wells_compare))
        .route("/wells/locations", post(handlers::wells_locations))
        // Sales Analysis
        .route("/sales/summary", post(handlers::sales_summary))
        // Advanced Analysis
        .route("/advanced/metrics", post(handlers::advanced_metrics))
        .route("/advanced/distribution", post(handlers::advanced_distribution))
        // Cost Estimator
        .route("/cost/estimate", post(handlers::cost_estimate))
        .route("/cost/compare", post(handlers::cost_compare))
        // Downloads
        .route("/export", post(handlers::export_csv))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_api_routes_health() {
        let app = api_routes(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        assert_eq!(v["data"]["records"], 3);
    }

    #[tokio::test]
    async fn test_api_routes_filter_options() {
        let app = api_routes(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/filters/options?column=Operator")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let v = body_json(resp).await;
        assert_eq!(v["data"]["options"], serde_json::json!(["All", "Apex", "Borealis"]));
    }

    #[tokio::test]
    async fn test_api_routes_wells_summary_with_filter() {
        let app = api_routes(test_state());
        let body = serde_json::json!({
            "filters": [{"kind": "equals", "column": "Operator", "value": "Apex"}]
        });
        let resp = app.oneshot(post_json("/wells/summary", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        assert_eq!(v["data"]["records"], 2);
        assert_eq!(v["data"]["kpis"][0]["key"], "IntLength");
        assert_eq!(v["data"]["kpis"][0]["value"], 800.0);
    }

    #[tokio::test]
    async fn test_api_routes_unknown_bin_is_bad_request() {
        let app = api_routes(test_state());
        let body = serde_json::json!({
            "filters": [{"kind": "bucket", "bins": "porosity", "bin": "high"}]
        });
        let resp = app.oneshot(post_json("/advanced/metrics", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v = body_json(resp).await;
        assert_eq!(v["error"]["code"], "BAD_REQUEST");
    }
}
