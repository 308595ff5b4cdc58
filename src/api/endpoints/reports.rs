//! Report analysis endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{AnalyzeRequest, ApiContext};
use crate::pipeline::extraction::{
    analyze_with_fallback, DeterministicAnalyzer, ExternalResponseAnalyzer, ReportAnalyzer,
};

/// Response header naming the analyzer that produced the body.
pub const SOURCE_HEADER: &str = "x-analysis-source";

/// `POST /api/reports/analyze`: validate the caller's external result if
/// one is supplied, otherwise run the extraction pipeline over the text.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = ctx.config.max_text_bytes;
    let Json(request) = payload.map_err(|r| ApiError::from_json_rejection(r, limit))?;

    let external_bytes = request.external_result.as_ref().map_or(0, String::len);
    if request.text.len() > limit || external_bytes > limit {
        return Err(ApiError::PayloadTooLarge { limit });
    }

    let fallback = DeterministicAnalyzer::new(ctx.resolve_profile(request.profile.as_deref())?);
    let text_bytes = request.text.len();

    // Regex passes over large text are CPU-bound; keep them off the reactor.
    let analysis = tokio::task::spawn_blocking(move || {
        let primary = request.external_result.map(ExternalResponseAnalyzer::new);
        analyze_with_fallback(
            primary.as_ref().map(|a| a as &dyn ReportAnalyzer),
            &fallback,
            &request.text,
        )
    })
    .await?;

    tracing::info!(
        profile = %fallback.profile,
        source = analysis.source.as_str(),
        text_bytes,
        parameters = analysis.result.parameters.len(),
        score = analysis.result.health_score,
        "Report analyzed"
    );

    Ok((
        [(SOURCE_HEADER, analysis.source.as_str())],
        Json(analysis.result),
    ))
}
