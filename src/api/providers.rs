use super::AppState;
use crate::error::Result;
use crate::models::ApiResponse;
use crate::services::registry::ProviderStats;
use axum::{extract::State, Json};

/// GET /api/v1/providers/stats
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProviderStats>>>> {
    Ok(Json(ApiResponse::success(state.registry.snapshot())))
}
