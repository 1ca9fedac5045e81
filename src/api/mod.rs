//! REST API module using Axum
//!
//! Exposes each dashboard page computation as a JSON endpoint under
//! `/api/v1`, wrapped in the [`envelope`] response shape. Every request
//! filters the shared, read-only dataset into its own subset.

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::DashboardState;

use axum::http::{header, Method, Uri};
use axum::response::Response;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use envelope::ApiErrorResponse;

/// Environment variable with comma-separated allowed CORS origins.
pub const CORS_ENV_VAR: &str = "PRODIGY_CORS_ORIGINS";

/// Filter descriptors are small; anything larger is a client bug.
const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `PRODIGY_CORS_ORIGINS` to a comma-separated list of allowed origins
/// for a dashboard front end served from elsewhere.
fn build_cors_layer() -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match std::env::var(CORS_ENV_VAR) {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            base.allow_origin(allowed)
        }
        Err(_) => base,
    }
}

async fn not_found(uri: Uri) -> Response {
    ApiErrorResponse::not_found(format!("No route for {}", uri.path()))
}

/// Create the complete application router.
pub fn create_app(state: DashboardState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
                .layer(build_cors_layer()),
        )
}
