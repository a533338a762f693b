use super::AppState;
use crate::error::Result;
use crate::models::ApiResponse;
use crate::services::aggregator::TransactionLookup;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default)]
    pub provider: Option<String>,
}

/// GET /api/v1/transaction/{id}?provider=vtpass
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<ApiResponse<TransactionLookup>>> {
    let lookup = state
        .aggregator
        .query_transaction(&transaction_id, query.provider.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(lookup)))
}
