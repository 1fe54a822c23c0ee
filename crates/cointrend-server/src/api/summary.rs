use axum::{extract::State, Extension, Json};
use cointrend_fusion::{PipelineOptions, Summary};

use crate::middleware::RequestId;

use super::{load_report, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn get_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Summary>>, ApiError> {
    let options = PipelineOptions {
        top_n: state.default_top_n,
        ..PipelineOptions::default()
    };
    let report = load_report(&state, options, &req_id.0).await?;

    Ok(Json(ApiResponse {
        data: report.summary,
        meta: ResponseMeta::with_sources(req_id.0, report.sources),
    }))
}
