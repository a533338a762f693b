use super::AppState;
use crate::error::Result;
use crate::models::{ApiResponse, Network, ServiceType};
use crate::services::aggregator::{AvailabilityReport, PricingSlot};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PricingQuery {
    pub service_type: ServiceType,
    #[serde(default)]
    pub network: Option<Network>,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub service_type: ServiceType,
    #[serde(default)]
    pub network: Option<Network>,
}

/// GET /api/v1/pricing?service_type=airtime&network=mtn&amount=500
pub async fn get_pricing(
    State(state): State<AppState>,
    Query(query): Query<PricingQuery>,
) -> Result<Json<ApiResponse<Vec<PricingSlot>>>> {
    let slots = state
        .aggregator
        .get_pricing(query.service_type, query.network, query.amount)
        .await;
    Ok(Json(ApiResponse::success(slots)))
}

/// GET /api/v1/availability?service_type=airtime&network=mtn
pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityReport>>> {
    let report = state
        .aggregator
        .get_availability(query.service_type, query.network)
        .await;
    Ok(Json(ApiResponse::success(report)))
}
