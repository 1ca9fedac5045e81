//! Response envelope and request body extraction for the dashboard API.
//!
//! Successful page responses are `{ "data": ..., "meta": { ... } }`; when a
//! page ran over a filtered subset, `meta.subset` carries how many records
//! survived the sidebar filters out of the loaded dataset. Failures, including
//! bodies that do not deserialize, are `{ "error": { code, message }, "meta" }`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const API_VERSION: &str = "1";

/// Record counts of the subset a page was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubsetMeta {
    /// Records left after filtering
    pub records: usize,
    /// Records in the loaded dataset
    pub of: usize,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: String,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subset: Option<SubsetMeta>,
}

impl ResponseMeta {
    fn now(subset: Option<SubsetMeta>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: API_VERSION,
            subset,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Response {
        Self::respond(data, None)
    }

    /// Page computed over `records` of the `of` loaded records.
    pub fn for_subset(data: T, records: usize, of: usize) -> Response {
        Self::respond(data, Some(SubsetMeta { records, of }))
    }

    fn respond(data: T, subset: Option<SubsetMeta>) -> Response {
        let body = Self {
            data,
            meta: ResponseMeta::now(subset),
        };
        (StatusCode::OK, axum::Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

impl ApiErrorResponse {
    fn build(status: StatusCode, code: &'static str, msg: impl Into<String>) -> Response {
        let body = Self {
            error: ErrorDetail {
                code,
                message: msg.into(),
            },
            meta: ResponseMeta::now(None),
        };
        (status, axum::Json(body)).into_response()
    }

    pub fn not_found(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::NOT_FOUND, "NOT_FOUND", msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg)
    }

    pub fn internal(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
    }

    /// Body that could not be read as the endpoint's request type.
    pub fn rejected_body(rejection: &JsonRejection) -> Response {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::payload_too_large(rejection.body_text());
        }
        Self::bad_request(rejection.body_text())
    }
}

// ============================================================================
// Body extractor
// ============================================================================

/// JSON request body whose rejections are answered in the error envelope.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Rejected request body: {}", rejection.body_text());
                Err(ApiErrorResponse::rejected_body(&rejection))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[derive(Debug, serde::Deserialize)]
    struct YearBody {
        year: i32,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_plain_ok_has_no_subset() {
        let resp = ApiResponse::ok(serde_json::json!({"status": "ok"}));
        assert_eq!(resp.status(), StatusCode::OK);

        let v = body_json(resp).await;
        assert_eq!(v["data"]["status"], "ok");
        assert_eq!(v["meta"]["version"], API_VERSION);
        assert!(v["meta"]["timestamp"].is_string());
        assert!(v["meta"].get("subset").is_none());
    }

    #[tokio::test]
    async fn test_subset_counts_in_meta() {
        let v = body_json(ApiResponse::for_subset(Vec::<u8>::new(), 4, 120)).await;
        assert_eq!(v["meta"]["subset"]["records"], 4);
        assert_eq!(v["meta"]["subset"]["of"], 120);
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let resp = ApiErrorResponse::bad_request("Unknown bin set 'porosity'");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let v = body_json(resp).await;
        assert_eq!(v["error"]["code"], "BAD_REQUEST");
        assert_eq!(v["error"]["message"], "Unknown bin set 'porosity'");
    }

    #[tokio::test]
    async fn test_api_json_accepts_valid_body() {
        let ApiJson(body) = ApiJson::<YearBody>::from_request(json_request(r#"{"year": 2024}"#), &())
            .await
            .unwrap();
        assert_eq!(body.year, 2024);
    }

    #[tokio::test]
    async fn test_api_json_wraps_type_errors() {
        let resp = ApiJson::<YearBody>::from_request(json_request(r#"{"year": "soon"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v = body_json(resp).await;
        assert_eq!(v["error"]["code"], "BAD_REQUEST");
        assert!(v["error"]["message"].as_str().unwrap().contains("year"));
    }

    #[tokio::test]
    async fn test_api_json_wraps_syntax_and_content_type_errors() {
        let resp = ApiJson::<YearBody>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert_eq!(body_json(resp).await["error"]["code"], "BAD_REQUEST");

        let plain = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"year": 2024}"#))
            .unwrap();
        let resp = ApiJson::<YearBody>::from_request(plain, &()).await.unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
