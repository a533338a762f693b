use super::AppState;
use crate::error::{AppError, Result};
use crate::models::{
    ApiResponse, IntentContext, IntentKind, ResponseStatus, ServiceRequest, ServiceResponse,
    TelecomIntent,
};
use crate::services::intent_service::convert_intent_to_service_request;
use crate::services::transaction_store::TransactionRecord;
use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Deserialize)]
pub struct AiPurchaseRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub context: Option<IntentContext>,
}

#[derive(Debug, Serialize)]
pub struct AiPurchaseResponse {
    #[serde(flatten)]
    pub result: ServiceResponse,
    pub intent: TelecomIntent,
}

/// POST /api/v1/purchase
///
/// Structured purchase path. The caller is responsible for any balance
/// check; this endpoint goes straight to the aggregator.
pub async fn purchase(
    State(state): State<AppState>,
    Json(request): Json<ServiceRequest>,
) -> Result<Json<ApiResponse<ServiceResponse>>> {
    request
        .validate()
        .map_err(AppError::BadRequest)?;

    let response = state.aggregator.purchase_service(&request).await;
    Ok(Json(ApiResponse::success(response)))
}

/// POST /api/v1/ai-purchase
///
/// Conversational path: parse → clarify? → convert → balance check →
/// purchase → debit → record → natural-language message.
pub async fn ai_purchase(
    State(state): State<AppState>,
    Json(req): Json<AiPurchaseRequest>,
) -> Result<Json<ApiResponse<AiPurchaseResponse>>> {
    let user_id = req
        .user_id
        .clone()
        .unwrap_or_else(|| ANONYMOUS_USER.to_string());

    let intent = state.intents.parse(&req.message, req.context.as_ref()).await;
    tracing::info!(
        "AI purchase: user={} intent={} confidence={:.2} needs_clarification={}",
        user_id,
        intent.intent,
        intent.confidence,
        intent.needs_clarification
    );

    if intent.intent == IntentKind::Unknown {
        let result = ServiceResponse::failure(
            ResponseStatus::InvalidIntent,
            0.0,
            intent
                .clarification_message
                .clone()
                .unwrap_or_else(|| "I could not work out what you want to buy.".to_string()),
        );
        return Ok(Json(ApiResponse::success(AiPurchaseResponse {
            result,
            intent,
        })));
    }

    if intent.needs_clarification {
        let result = ServiceResponse::failure(
            ResponseStatus::ClarificationNeeded,
            intent.entities.amount.unwrap_or(0.0),
            intent
                .clarification_message
                .clone()
                .unwrap_or_else(|| "I need one more detail to continue.".to_string()),
        );
        return Ok(Json(ApiResponse::success(AiPurchaseResponse {
            result,
            intent,
        })));
    }

    let request = match convert_intent_to_service_request(&intent) {
        Some(request) => request,
        None => {
            let result = ServiceResponse::failure(
                ResponseStatus::InvalidIntent,
                intent.entities.amount.unwrap_or(0.0),
                "The request is missing details I could not recover.",
            );
            return Ok(Json(ApiResponse::success(AiPurchaseResponse {
                result,
                intent,
            })));
        }
    };

    let balance = state.wallet.balance(&user_id).await?;
    if balance < request.amount {
        let result = ServiceResponse::failure(
            ResponseStatus::InsufficientBalance,
            request.amount,
            format!(
                "Your wallet balance (₦{balance:.2}) is not enough for this ₦{:.2} purchase.",
                request.amount
            ),
        );
        return Ok(Json(ApiResponse::success(AiPurchaseResponse {
            result,
            intent,
        })));
    }

    let mut result = state.aggregator.purchase_service(&request).await;

    if result.success {
        // Plan-priced purchases can reach here with amount 0; there is
        // nothing to take from the wallet until the provider prices them.
        if request.amount > 0.0 {
            let memo = purchase_memo(&request);
            state.wallet.debit(&user_id, request.amount, &memo).await?;
        }

        if let (Some(provider), Some(transaction_id)) =
            (result.provider.clone(), result.transaction_id.clone())
        {
            state
                .transactions
                .record(TransactionRecord {
                    transaction_id,
                    user_id: user_id.clone(),
                    service_type: request.service_type,
                    network: request.network,
                    amount: request.amount,
                    commission: result.commission,
                    provider,
                    status: "success".to_string(),
                    created_at: Utc::now(),
                })
                .await?;
        }

        result.message = success_message(&request);
    }

    Ok(Json(ApiResponse::success(AiPurchaseResponse {
        result,
        intent,
    })))
}

fn purchase_memo(request: &ServiceRequest) -> String {
    format!(
        "{} {} purchase",
        request.network_label(),
        request.service_type
    )
}

fn success_message(request: &ServiceRequest) -> String {
    match (&request.phone, &request.meter_number) {
        (Some(phone), _) => format!(
            "Done! ₦{:.2} {} {} delivered to {}.",
            request.amount,
            request.network_label(),
            request.service_type,
            phone
        ),
        (None, Some(meter)) => format!(
            "Done! ₦{:.2} {} credited to meter {}.",
            request.amount, request.service_type, meter
        ),
        _ => format!(
            "Done! ₦{:.2} {} purchase completed.",
            request.amount, request.service_type
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Network, ServiceType};

    fn airtime_request() -> ServiceRequest {
        ServiceRequest {
            service_type: ServiceType::Airtime,
            network: Some(Network::Mtn),
            amount: 500.0,
            phone: Some("2348012345678".to_string()),
            variation: None,
            meter_number: None,
            meter_type: None,
            iuc_number: None,
        }
    }

    #[test]
    fn success_message_names_the_delivery_target() {
        let message = success_message(&airtime_request());
        assert!(message.contains("2348012345678"));
        assert!(message.contains("mtn"));

        let electricity = ServiceRequest {
            service_type: ServiceType::Electricity,
            network: None,
            phone: None,
            meter_number: Some("45021657890".to_string()),
            ..airtime_request()
        };
        assert!(success_message(&electricity).contains("meter 45021657890"));
    }

    #[test]
    fn purchase_memo_is_compact() {
        assert_eq!(purchase_memo(&airtime_request()), "mtn airtime purchase");
    }
}
