use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== ENUMS ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Airtime,
    Data,
    Electricity,
    Cable,
    Betting,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Airtime => "airtime",
            ServiceType::Data => "data",
            ServiceType::Electricity => "electricity",
            ServiceType::Cable => "cable",
            ServiceType::Betting => "betting",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mtn,
    Airtel,
    Glo,
    #[serde(rename = "9mobile")]
    NineMobile,
    Smile,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mtn => "mtn",
            Network::Airtel => "airtel",
            Network::Glo => "glo",
            Network::NineMobile => "9mobile",
            Network::Smile => "smile",
        }
    }

    pub fn parse(raw: &str) -> Option<Network> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mtn" => Some(Network::Mtn),
            "airtel" => Some(Network::Airtel),
            "glo" => Some(Network::Glo),
            "9mobile" => Some(Network::NineMobile),
            "smile" => Some(Network::Smile),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Failed,
    Pending,
    ClarificationNeeded,
    InvalidIntent,
    InsufficientBalance,
    Error,
}

// ==================== REQUEST / RESPONSE ====================

/// Provider-agnostic purchase request. `network` is required for telco
/// services (airtime, data) and informational for the rest; the converter
/// and request validation enforce that split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub service_type: ServiceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iuc_number: Option<String>,
}

impl ServiceRequest {
    /// Boundary validation: amount must be positive and the request must
    /// carry the target identifier its service type delivers to.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err("amount must be a positive number".to_string());
        }
        if self.amount == 0.0 && self.variation.is_none() {
            return Err("amount must be a positive number".to_string());
        }

        match self.service_type {
            ServiceType::Airtime | ServiceType::Data => {
                if self.network.is_none() {
                    return Err(format!("network is required for {}", self.service_type));
                }
                if self.phone.is_none() {
                    return Err(format!(
                        "phone is required for {} delivery",
                        self.service_type
                    ));
                }
            }
            ServiceType::Electricity => {
                if self.meter_number.is_none() {
                    return Err("meter_number is required for electricity".to_string());
                }
            }
            ServiceType::Cable => {
                if self.iuc_number.is_none() {
                    return Err("iuc_number is required for cable".to_string());
                }
            }
            ServiceType::Betting => {
                if self.phone.is_none() {
                    return Err("phone (customer id) is required for betting".to_string());
                }
            }
        }

        Ok(())
    }

    pub fn network_label(&self) -> &'static str {
        self.network.map(|n| n.as_str()).unwrap_or("any network")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceResponse {
    pub success: bool,
    pub provider: Option<String>,
    pub transaction_id: Option<String>,
    pub amount: f64,
    pub commission: f64,
    pub status: ResponseStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceResponse {
    pub fn success(
        provider: impl Into<String>,
        transaction_id: impl Into<String>,
        amount: f64,
        commission: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            provider: Some(provider.into()),
            transaction_id: Some(transaction_id.into()),
            amount,
            commission,
            status: ResponseStatus::Success,
            message: message.into(),
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn failure(status: ResponseStatus, amount: f64, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            provider: None,
            transaction_id: None,
            amount,
            commission: 0.0,
            status,
            message,
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

// ==================== ATTEMPT LOG ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptOutcome {
    Success,
    Failed,
}

/// One entry of the per-request provider attempt trail. Diagnostics only,
/// never persisted as authoritative transaction state.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderAttempt {
    pub provider_id: String,
    pub outcome: AttemptOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProviderAttempt {
    pub fn success(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            outcome: AttemptOutcome::Success,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(provider_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            outcome: AttemptOutcome::Failed,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}

// ==================== API ENVELOPE ====================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_success_sets_flag() {
        let response = ApiResponse::success("ok");
        assert!(response.success);
        assert_eq!(response.data, "ok");
    }

    #[test]
    fn service_type_round_trips_through_serde() {
        let json = serde_json::to_string(&ServiceType::Electricity).unwrap();
        assert_eq!(json, "\"electricity\"");
        let parsed: ServiceType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ServiceType::Electricity);
    }

    #[test]
    fn network_nine_mobile_uses_numeric_name() {
        let json = serde_json::to_string(&Network::NineMobile).unwrap();
        assert_eq!(json, "\"9mobile\"");
        assert_eq!(Network::parse("9MOBILE"), Some(Network::NineMobile));
        assert_eq!(Network::parse("verizon"), None);
    }

    #[test]
    fn airtime_request_requires_phone_and_network() {
        let request = ServiceRequest {
            service_type: ServiceType::Airtime,
            network: Some(Network::Mtn),
            amount: 500.0,
            phone: None,
            variation: None,
            meter_number: None,
            meter_type: None,
            iuc_number: None,
        };
        assert!(request.validate().is_err());

        let request = ServiceRequest {
            phone: Some("2348012345678".to_string()),
            ..request
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn zero_amount_is_only_valid_with_a_variation() {
        let mut request = ServiceRequest {
            service_type: ServiceType::Data,
            network: Some(Network::Glo),
            amount: 0.0,
            phone: Some("2348012345678".to_string()),
            variation: None,
            meter_number: None,
            meter_type: None,
            iuc_number: None,
        };
        assert!(request.validate().is_err());

        request.variation = Some("2gb".to_string());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn successful_response_upholds_invariant() {
        let response = ServiceResponse::success("vtpass", "VTP_1", 100.0, 2.5, "done");
        assert!(response.success);
        assert_eq!(response.status, ResponseStatus::Success);
        assert!(response.provider.is_some());
    }
}
