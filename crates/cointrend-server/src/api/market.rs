use axum::{
    extract::{Query, State},
    Extension, Json,
};
use cointrend_core::MarketSentimentRow;
use cointrend_fusion::PipelineOptions;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{load_report, parse_int_param, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct MarketSentimentQuery {
    pub limit: Option<String>,
}

/// Keeps the last `limit` aligned rows in their original order; `None`
/// keeps all of them.
pub(super) fn tail(rows: Vec<MarketSentimentRow>, limit: Option<usize>) -> Vec<MarketSentimentRow> {
    match limit {
        Some(n) if n < rows.len() => {
            let skip = rows.len() - n;
            rows.into_iter().skip(skip).collect()
        }
        _ => rows,
    }
}

pub(super) fn validate_limit(limit: Option<i64>) -> Result<Option<usize>, String> {
    match limit {
        None => Ok(None),
        Some(n) if n >= 1 => Ok(Some(usize::try_from(n).unwrap_or(usize::MAX))),
        Some(n) => Err(format!("limit must be at least 1, got {n}")),
    }
}

pub(super) async fn get_market_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MarketSentimentQuery>,
) -> Result<Json<ApiResponse<Vec<MarketSentimentRow>>>, ApiError> {
    let limit = parse_int_param("limit", query.limit.as_deref())
        .and_then(validate_limit)
        .map_err(|msg| ApiError::new(req_id.0.clone(), "validation_error", msg))?;

    let report = load_report(&state, PipelineOptions::default(), &req_id.0).await?;

    Ok(Json(ApiResponse {
        data: tail(report.market_sentiment, limit),
        meta: ResponseMeta::with_sources(req_id.0, report.sources),
    }))
}
