use super::{
    generate_reference, MeterInfo, ProviderClient, ProviderError, ProviderPricing,
    ProviderResult, ProviderTransaction, PurchaseOutcome,
};
use crate::models::{Network, ServiceRequest, ServiceType};

const REFERENCE_PREFIX: &str = "BSP";

/// BillsPay client. Airtime, data, electricity and betting wallet funding.
#[derive(Debug, Clone)]
pub struct BillsPayClient {
    api_key: String,
    api_url: String,
}

impl BillsPayClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.unwrap_or_default(),
            api_url: "https://api.billspay.ng/v1".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ProviderClient for BillsPayClient {
    fn id(&self) -> &'static str {
        crate::constants::PROVIDER_BILLSPAY
    }

    fn service_code(
        &self,
        service_type: ServiceType,
        network: Option<Network>,
    ) -> Option<&'static str> {
        match (service_type, network) {
            (ServiceType::Airtime, Some(Network::Mtn)) => Some("airtime/mtn"),
            (ServiceType::Airtime, Some(Network::Airtel)) => Some("airtime/airtel"),
            (ServiceType::Airtime, Some(Network::Glo)) => Some("airtime/glo"),
            (ServiceType::Airtime, Some(Network::NineMobile)) => Some("airtime/9mobile"),
            (ServiceType::Data, Some(Network::Mtn)) => Some("data/mtn"),
            (ServiceType::Data, Some(Network::Airtel)) => Some("data/airtel"),
            (ServiceType::Data, Some(Network::Glo)) => Some("data/glo"),
            (ServiceType::Electricity, _) => Some("power/prepaid"),
            (ServiceType::Betting, _) => Some("betting/topup"),
            _ => None,
        }
    }

    async fn purchase(
        &self,
        code: &str,
        request: &ServiceRequest,
    ) -> ProviderResult<PurchaseOutcome> {
        tracing::debug!(
            "BillsPay purchase via {} code={} amount={} (api_key_set={})",
            self.api_url,
            code,
            request.amount,
            !self.api_key.is_empty()
        );
        // TODO: Wire to the live BillsPay payments endpoint; the simulated
        // path keeps the same outcome shape.
        Ok(PurchaseOutcome {
            transaction_id: generate_reference(REFERENCE_PREFIX),
            amount: request.amount,
            message: format!("{code} fulfilled"),
        })
    }

    async fn pricing(&self, code: &str, amount: Option<f64>) -> ProviderResult<ProviderPricing> {
        Ok(ProviderPricing {
            service_code: code.to_string(),
            face_amount: amount,
            cost: amount.map(|a| a * (1.0 - crate::constants::COMMISSION_BILLSPAY)),
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
            status: "success".to_string(),
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
        if meter_number.len() != 11 || !meter_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProviderError::Api(format!(
                "{service_id} rejected meter {meter_number}"
            )));
        }
        Ok(MeterInfo {
            meter_number: meter_number.to_string(),
            meter_type: meter_type.to_string(),
            customer_name: "BILLSPAY CUSTOMER".to_string(),
            address: service_id.to_string(),
        })
    }

    async fn handle_webhook(&self, payload: serde_json::Value) -> ProviderResult<()> {
        let reference = payload
            .get("reference")
            .or_else(|| payload.get("transaction_id"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        tracing::info!("BillsPay webhook acknowledged: reference={}", reference);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_covers_betting_on_any_network() {
        let client = BillsPayClient::new(None);
        assert_eq!(
            client.service_code(ServiceType::Betting, None),
            Some("betting/topup")
        );
        assert_eq!(
            client.service_code(ServiceType::Betting, Some(Network::Smile)),
            Some("betting/topup")
        );
        assert_eq!(client.service_code(ServiceType::Cable, None), None);
    }

    #[tokio::test]
    async fn meter_verification_requires_eleven_digits() {
        let client = BillsPayClient::new(None);
        assert!(client
            .verify_meter("eko-electric", "45021657890", "prepaid")
            .await
            .is_ok());
        assert!(client
            .verify_meter("eko-electric", "450216578", "prepaid")
            .await
            .is_err());
    }
}
