use super::AppState;
use crate::error::{AppError, Result};
use crate::models::ApiResponse;
use crate::services::aggregator::MeterVerification;
use axum::{extract::State, Json};
use serde::Deserialize;

const DEFAULT_SERVICE_ID: &str = "prepaid-electric";

#[derive(Debug, Deserialize)]
pub struct VerifyMeterRequest {
    pub meter_number: String,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default = "default_meter_type", rename = "type")]
    pub meter_type: String,
}

fn default_meter_type() -> String {
    "prepaid".to_string()
}

/// POST /api/v1/verify-meter
pub async fn verify_meter(
    State(state): State<AppState>,
    Json(req): Json<VerifyMeterRequest>,
) -> Result<Json<ApiResponse<MeterVerification>>> {
    if req.meter_number.trim().is_empty() {
        return Err(AppError::BadRequest("meter_number is required".to_string()));
    }

    let service_id = req.service_id.as_deref().unwrap_or(DEFAULT_SERVICE_ID);
    let verification = state
        .aggregator
        .verify_meter(service_id, req.meter_number.trim(), &req.meter_type)
        .await?;
    Ok(Json(ApiResponse::success(verification)))
}
