use axum::{
    extract::{Query, State},
    Extension, Json,
};
use cointrend_core::ScoredEntity;
use cointrend_fusion::PipelineOptions;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{load_report, parse_int_param, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) const MAX_TOP_N: i64 = 100;

#[derive(Debug, Deserialize)]
pub(super) struct TrendingQuery {
    pub top_n: Option<String>,
}

pub(super) fn validate_top_n(top_n: Option<i64>, default: usize) -> Result<usize, String> {
    match top_n {
        None => Ok(default),
        Some(n) if (1..=MAX_TOP_N).contains(&n) => {
            usize::try_from(n).map_err(|e| e.to_string())
        }
        Some(n) => Err(format!("top_n must be between 1 and {MAX_TOP_N}, got {n}")),
    }
}

pub(super) async fn get_trending(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<ApiResponse<Vec<ScoredEntity>>>, ApiError> {
    let top_n = parse_int_param("top_n", query.top_n.as_deref())
        .and_then(|n| validate_top_n(n, state.default_top_n))
        .map_err(|msg| ApiError::new(req_id.0.clone(), "validation_error", msg))?;

    let options = PipelineOptions {
        top_n,
        ..PipelineOptions::default()
    };
    let report = load_report(&state, options, &req_id.0).await?;

    Ok(Json(ApiResponse {
        data: report.trending,
        meta: ResponseMeta::with_sources(req_id.0, report.sources),
    }))
}
