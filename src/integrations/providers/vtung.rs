use super::{
    generate_reference, ProviderClient, ProviderError, ProviderPricing, ProviderResult,
    ProviderTransaction, PurchaseOutcome,
};
use crate::models::{Network, ServiceRequest, ServiceType};

const REFERENCE_PREFIX: &str = "VTU";

/// VTU.ng client. Airtime and data only; no meter verification capability.
#[derive(Debug, Clone)]
pub struct VtuNgClient {
    api_key: String,
    api_url: String,
}

impl VtuNgClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.unwrap_or_default(),
            api_url: "https://vtu.ng/wp-json/api/v1".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ProviderClient for VtuNgClient {
    fn id(&self) -> &'static str {
        crate::constants::PROVIDER_VTU
    }

    fn service_code(
        &self,
        service_type: ServiceType,
        network: Option<Network>,
    ) -> Option<&'static str> {
        match (service_type, network) {
            (ServiceType::Airtime, Some(Network::Mtn)) => Some("airtime_mtn"),
            (ServiceType::Airtime, Some(Network::Airtel)) => Some("airtime_airtel"),
            (ServiceType::Airtime, Some(Network::Glo)) => Some("airtime_glo"),
            (ServiceType::Airtime, Some(Network::NineMobile)) => Some("airtime_9mobile"),
            (ServiceType::Data, Some(Network::Mtn)) => Some("data_mtn"),
            (ServiceType::Data, Some(Network::Glo)) => Some("data_glo"),
            _ => None,
        }
    }

    async fn purchase(
        &self,
        code: &str,
        request: &ServiceRequest,
    ) -> ProviderResult<PurchaseOutcome> {
        tracing::debug!(
            "VTU.ng purchase via {} code={} amount={} (api_key_set={})",
            self.api_url,
            code,
            request.amount,
            !self.api_key.is_empty()
        );
        // TODO: Swap in the real VTU.ng topup endpoint.
        Ok(PurchaseOutcome {
            transaction_id: generate_reference(REFERENCE_PREFIX),
            amount: request.amount,
            message: format!("{code} completed"),
        })
    }

    async fn pricing(&self, code: &str, amount: Option<f64>) -> ProviderResult<ProviderPricing> {
        Ok(ProviderPricing {
            service_code: code.to_string(),
            face_amount: amount,
            cost: amount.map(|a| a * (1.0 - crate::constants::COMMISSION_VTU)),
            currency: "NGN",
        })
    }

    async fn availability(&self, _code: &str) -> ProviderResult<bool> {
        Ok(true)
    }

    async fn query_transaction(
        &self,
        transaction_id: &str,
    ) -> ProviderResult<ProviderTransaction> {
        if !transaction_id.starts_with(REFERENCE_PREFIX) {
            return Err(ProviderError::UnknownTransaction(transaction_id.to_string()));
        }
        Ok(ProviderTransaction {
            transaction_id: transaction_id.to_string(),
            status: "completed".to_string(),
            service_code: "unknown".to_string(),
            amount: 0.0,
        })
    }

    async fn handle_webhook(&self, payload: serde_json::Value) -> ProviderResult<()> {
        tracing::info!(
            "VTU.ng webhook acknowledged: order={}",
            payload
                .get("order_id")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_limited_to_telco_services() {
        let client = VtuNgClient::new(None);
        assert_eq!(
            client.service_code(ServiceType::Airtime, Some(Network::Glo)),
            Some("airtime_glo")
        );
        assert_eq!(
            client.service_code(ServiceType::Data, Some(Network::Airtel)),
            None
        );
        assert_eq!(client.service_code(ServiceType::Electricity, None), None);
    }

    #[tokio::test]
    async fn meter_verification_is_not_supported() {
        let client = VtuNgClient::new(None);
        assert!(!client.supports_meter_verification());
        let err = client
            .verify_meter("ikeja-electric", "45021657890", "prepaid")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MeterVerificationUnsupported));
    }
}
