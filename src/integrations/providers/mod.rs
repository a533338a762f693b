pub mod billspay;
pub mod vtpass;
pub mod vtung;

pub use billspay::BillsPayClient;
pub use vtpass::VtPassClient;
pub use vtung::VtuNgClient;

use crate::models::{Network, ServiceRequest, ServiceType};
use serde::Serialize;
use thiserror::Error;

/// Failure of a single provider attempt. These are expected values in the
/// fallback loop and are absorbed by the aggregator; they never cross the
/// API boundary as raw errors.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider rejected the request: {0}")]
    Api(String),

    #[error("no service code for {service_type} on {network}")]
    NoServiceCode {
        service_type: ServiceType,
        network: String,
    },

    #[error("transaction {0} not recognized")]
    UnknownTransaction(String),

    #[error("meter verification not supported by this provider")]
    MeterVerificationUnsupported,

    #[error("provider call timed out after {0}ms")]
    Timeout(u64),

    #[error("upstream transport error: {0}")]
    Transport(String),
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOutcome {
    pub transaction_id: String,
    pub amount: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderPricing {
    pub service_code: String,
    pub face_amount: Option<f64>,
    /// What the platform pays the provider for `face_amount` of value.
    pub cost: Option<f64>,
    pub currency: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderTransaction {
    pub transaction_id: String,
    pub status: String,
    pub service_code: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeterInfo {
    pub meter_number: String,
    pub meter_type: String,
    pub customer_name: String,
    pub address: String,
}

/// Capability interface every upstream operator implements. How a client
/// talks to its API (HTTP shape, auth, retries) is its own concern; the
/// aggregator only sees this surface.
#[async_trait::async_trait]
pub trait ProviderClient: Send + Sync {
    /// Stable identifier, matches the registry descriptor id.
    fn id(&self) -> &'static str;

    /// Native service code for a (service, network) pair from this
    /// provider's static catalogue. `None` means the combination is not
    /// sellable through this provider.
    fn service_code(&self, service_type: ServiceType, network: Option<Network>)
        -> Option<&'static str>;

    async fn purchase(
        &self,
        code: &str,
        request: &ServiceRequest,
    ) -> ProviderResult<PurchaseOutcome>;

    async fn pricing(&self, code: &str, amount: Option<f64>) -> ProviderResult<ProviderPricing>;

    async fn availability(&self, code: &str) -> ProviderResult<bool>;

    async fn query_transaction(&self, transaction_id: &str)
        -> ProviderResult<ProviderTransaction>;

    /// Meter verification is an optional capability; callers must check the
    /// flag instead of probing the method.
    fn supports_meter_verification(&self) -> bool {
        false
    }

    async fn verify_meter(
        &self,
        service_id: &str,
        meter_number: &str,
        meter_type: &str,
    ) -> ProviderResult<MeterInfo> {
        let _ = (service_id, meter_number, meter_type);
        Err(ProviderError::MeterVerificationUnsupported)
    }

    /// Fire-and-forget notification from the upstream operator.
    async fn handle_webhook(&self, payload: serde_json::Value) -> ProviderResult<()>;
}

/// Shared helper for the simulated clients: opaque reference ids in the
/// provider's own namespace, e.g. `VTP_6fa1...`.
pub(crate) fn generate_reference(prefix: &str) -> String {
    let id_bytes: [u8; 8] = rand::random();
    format!("{}_{}", prefix, hex::encode(id_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_reference_is_namespaced_and_unique() {
        let a = generate_reference("VTP");
        let b = generate_reference("VTP");
        assert!(a.starts_with("VTP_"));
        assert_eq!(a.len(), "VTP_".len() + 16);
        assert_ne!(a, b);
    }

    #[test]
    fn provider_error_messages_are_human_readable() {
        let err = ProviderError::NoServiceCode {
            service_type: ServiceType::Betting,
            network: "mtn".to_string(),
        };
        assert_eq!(err.to_string(), "no service code for betting on mtn");
    }
}
