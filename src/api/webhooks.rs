use super::AppState;
use crate::models::ApiResponse;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// POST /api/v1/webhook/{provider}
///
/// Third-party notifications are fire-and-forget: an unknown provider key
/// or a handler failure is logged, and the sender always gets an ack so it
/// does not retry forever.
pub async fn receive(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> Json<ApiResponse<WebhookAck>> {
    state.aggregator.dispatch_webhook(&provider, payload).await;
    Json(ApiResponse::success(WebhookAck { received: true }))
}
