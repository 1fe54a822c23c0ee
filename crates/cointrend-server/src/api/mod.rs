mod market;
mod summary;
mod trending;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use cointrend_core::AppConfig;
use cointrend_fusion::{run_pipeline, PipelineOptions, PipelineReport, SourceReport};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Everything a request needs to rebuild its view from scratch. No pipeline
/// output is cached between requests.
#[derive(Clone)]
pub struct AppState {
    pub raw_data_dir: Arc<PathBuf>,
    pub default_top_n: usize,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            raw_data_dir: Arc::new(config.raw_data_dir.clone()),
            default_top_n: config.default_top_n,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    /// Per-source status of the pipeline run behind this response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceReport>>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    raw_data_dir: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
            sources: None,
        }
    }

    pub(super) fn with_sources(request_id: String, sources: Vec<SourceReport>) -> Self {
        Self {
            sources: Some(sources),
            ..Self::new(request_id)
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Reads the raw tables and runs the pipeline on the blocking pool.
///
/// Degraded sources are part of the returned report; the only error is a
/// panicked or cancelled worker.
pub(super) async fn load_report(
    state: &AppState,
    options: PipelineOptions,
    request_id: &str,
) -> Result<PipelineReport, ApiError> {
    let raw_dir = Arc::clone(&state.raw_data_dir);
    let report = tokio::task::spawn_blocking(move || {
        run_pipeline(cointrend_sources::load_raw_inputs(&raw_dir), &options)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "pipeline worker failed");
        ApiError::new(request_id, "internal_error", "pipeline run failed")
    })?;

    for degraded in report.degraded_sources() {
        tracing::warn!(source = %degraded.source, "serving with degraded source");
    }
    Ok(report)
}

/// Parses an optional integer query parameter. Values arrive as strings so a
/// non-numeric one is reported in the error envelope.
pub(super) fn parse_int_param(name: &str, raw: Option<&str>) -> Result<Option<i64>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("{name} must be an integer, got '{text}'")),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/trending", get(trending::get_trending))
        .route(
            "/api/v1/market-sentiment",
            get(market::get_market_sentiment),
        )
        .route("/api/v1/summary", get(summary::get_summary))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    if state.raw_data_dir.is_dir() {
        (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    raw_data_dir: "ok",
                },
                meta,
            }),
        )
    } else {
        tracing::warn!(
            path = %state.raw_data_dir.display(),
            "health check: raw data directory missing"
        );
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                data: HealthData {
                    status: "degraded",
                    raw_data_dir: "missing",
                },
                meta,
            }),
        )
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
