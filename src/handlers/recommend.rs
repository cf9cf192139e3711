use axum::{Json, body::Bytes, extract::State};

use super::AppState;
use crate::error::Result;
use crate::models::RecommendResponse;

/// POST /api/recommend
///
/// Validation happens before the scorer is touched. If the client goes away
/// mid-request the handler future is dropped, which kills the scorer child.
pub async fn recommend(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RecommendResponse>> {
    let req = state.validator.preference_request(&body).inspect_err(|e| {
        tracing::warn!(error = %e, "Rejected recommendation request");
    })?;

    let recommendations = state.recommender.recommend(&req).await?;
    Ok(Json(RecommendResponse { recommendations }))
}
