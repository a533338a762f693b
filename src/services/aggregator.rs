use crate::error::{AppError, Result};
use crate::integrations::providers::{
    MeterInfo, ProviderError, ProviderResult, ProviderTransaction,
};
use crate::models::{
    Network, ProviderAttempt, ResponseStatus, ServiceRequest, ServiceResponse, ServiceType,
};
use crate::services::registry::{ProviderDescriptor, ProviderRegistry};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

// ==================== FAN-OUT RESULT SHAPES ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Unavailable,
}

/// One provider's slot in a pricing fan-out. A provider that fails keeps its
/// slot with the captured error instead of disappearing from the result.
#[derive(Debug, Serialize)]
pub struct PricingSlot {
    pub provider: String,
    pub status: SlotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub commission: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilitySlot {
    pub provider: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityReport {
    pub availability: Vec<AvailabilitySlot>,
    pub overall_status: SlotStatus,
}

#[derive(Debug, Serialize)]
pub struct TransactionLookup {
    pub provider: String,
    pub transaction: ProviderTransaction,
}

#[derive(Debug, Serialize)]
pub struct MeterVerification {
    pub provider: String,
    pub meter: MeterInfo,
}

// ==================== AGGREGATOR ====================

/// Telecom Aggregator - routes purchases across upstream providers with
/// priority fallback, and fans read-only queries out to every candidate.
pub struct TelecomAggregator {
    registry: Arc<ProviderRegistry>,
    provider_timeout: Duration,
}

impl TelecomAggregator {
    pub fn new(registry: Arc<ProviderRegistry>, provider_timeout: Duration) -> Self {
        Self {
            registry,
            provider_timeout,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Execute a purchase with priority fallback. Providers are tried one at
    /// a time so at most one upstream is ever charged; the first success
    /// ends the loop.
    pub async fn purchase_service(&self, request: &ServiceRequest) -> ServiceResponse {
        let (response, attempts) = self.purchase_with_attempts(request).await;
        if !response.success && !attempts.is_empty() {
            tracing::warn!(
                "Purchase failed after {} attempt(s): {}",
                attempts.len(),
                request.service_type
            );
        }
        response
    }

    /// Same as [`purchase_service`], returning the per-provider attempt
    /// trail for diagnostics.
    pub async fn purchase_with_attempts(
        &self,
        request: &ServiceRequest,
    ) -> (ServiceResponse, Vec<ProviderAttempt>) {
        let candidates = self.registry.providers_for(request.service_type);
        if candidates.is_empty() {
            let response = ServiceResponse::failure(
                ResponseStatus::Failed,
                request.amount,
                format!(
                    "No providers available for {} on {}",
                    request.service_type,
                    request.network_label()
                ),
            );
            return (response, Vec::new());
        }

        let mut attempts = Vec::with_capacity(candidates.len());

        for descriptor in candidates {
            let code = match descriptor
                .client
                .service_code(request.service_type, request.network)
            {
                Some(code) => code,
                None => {
                    let err = ProviderError::NoServiceCode {
                        service_type: request.service_type,
                        network: request.network_label().to_string(),
                    };
                    tracing::warn!("Provider {} skipped: {}", descriptor.id, err);
                    attempts.push(ProviderAttempt::failed(&descriptor.id, err.to_string()));
                    continue;
                }
            };

            match self
                .with_timeout(descriptor.client.purchase(code, request))
                .await
            {
                Ok(outcome) => {
                    attempts.push(ProviderAttempt::success(&descriptor.id));
                    let commission = request.amount * descriptor.commission;
                    tracing::info!(
                        "Purchase fulfilled by {}: transaction={} amount={}",
                        descriptor.id,
                        outcome.transaction_id,
                        request.amount
                    );
                    let response = ServiceResponse::success(
                        &descriptor.id,
                        outcome.transaction_id,
                        request.amount,
                        commission,
                        outcome.message,
                    );
                    return (response, attempts);
                }
                Err(err) => {
                    tracing::warn!("Provider {} failed: {}", descriptor.id, err);
                    attempts.push(ProviderAttempt::failed(&descriptor.id, err.to_string()));
                }
            }
        }

        let response = ServiceResponse::failure(
            ResponseStatus::Failed,
            request.amount,
            format!(
                "All providers failed for {} on {}",
                request.service_type,
                request.network_label()
            ),
        )
        .with_error(
            attempts
                .iter()
                .filter_map(|a| a.error.as_deref())
                .collect::<Vec<_>>()
                .join("; "),
        );
        (response, attempts)
    }

    /// Query every matching provider's pricing. One entry per candidate;
    /// failures are captured in-slot, never dropped.
    pub async fn get_pricing(
        &self,
        service_type: ServiceType,
        network: Option<Network>,
        amount: Option<f64>,
    ) -> Vec<PricingSlot> {
        let candidates = self.registry.providers_for(service_type);

        let futures = candidates.into_iter().map(|descriptor| async move {
            match descriptor.client.service_code(service_type, network) {
                None => PricingSlot {
                    provider: descriptor.id.clone(),
                    status: SlotStatus::Unavailable,
                    service_code: None,
                    face_amount: None,
                    cost: None,
                    commission: descriptor.commission,
                    error: Some(format!("no service code for {service_type}")),
                },
                Some(code) => match self.with_timeout(descriptor.client.pricing(code, amount)).await
                {
                    Ok(pricing) => PricingSlot {
                        provider: descriptor.id.clone(),
                        status: SlotStatus::Available,
                        service_code: Some(pricing.service_code),
                        face_amount: pricing.face_amount,
                        cost: pricing.cost,
                        commission: descriptor.commission,
                        error: None,
                    },
                    Err(err) => PricingSlot {
                        provider: descriptor.id.clone(),
                        status: SlotStatus::Unavailable,
                        service_code: Some(code.to_string()),
                        face_amount: None,
                        cost: None,
                        commission: descriptor.commission,
                        error: Some(err.to_string()),
                    },
                },
            }
        });

        futures_util::future::join_all(futures).await
    }

    /// Availability fan-out; overall status is available iff at least one
    /// provider reports available.
    pub async fn get_availability(
        &self,
        service_type: ServiceType,
        network: Option<Network>,
    ) -> AvailabilityReport {
        let candidates = self.registry.providers_for(service_type);

        let futures = candidates.into_iter().map(|descriptor| async move {
            match descriptor.client.service_code(service_type, network) {
                None => AvailabilitySlot {
                    provider: descriptor.id.clone(),
                    available: false,
                    error: Some(format!("no service code for {service_type}")),
                },
                Some(code) => match self.with_timeout(descriptor.client.availability(code)).await {
                    Ok(available) => AvailabilitySlot {
                        provider: descriptor.id.clone(),
                        available,
                        error: None,
                    },
                    Err(err) => AvailabilitySlot {
                        provider: descriptor.id.clone(),
                        available: false,
                        error: Some(err.to_string()),
                    },
                },
            }
        });

        let availability = futures_util::future::join_all(futures).await;
        let overall_status = if availability.iter().any(|slot| slot.available) {
            SlotStatus::Available
        } else {
            SlotStatus::Unavailable
        };

        AvailabilityReport {
            availability,
            overall_status,
        }
    }

    /// Look a transaction up. With a provider id the call is delegated to
    /// that provider only and an unknown id is a hard error; without one,
    /// every registered provider is asked in registry order.
    pub async fn query_transaction(
        &self,
        transaction_id: &str,
        provider_id: Option<&str>,
    ) -> Result<TransactionLookup> {
        if let Some(provider_id) = provider_id {
            let descriptor = self.registry.provider_by_id(provider_id).ok_or_else(|| {
                AppError::NotFound(format!("Provider {provider_id} is not registered"))
            })?;
            let transaction = self
                .with_timeout(descriptor.client.query_transaction(transaction_id))
                .await
                .map_err(|err| match err {
                    ProviderError::UnknownTransaction(id) => AppError::NotFound(format!(
                        "Transaction {id} not found at {provider_id}"
                    )),
                    other => AppError::ExternalAPI(other.to_string()),
                })?;
            return Ok(TransactionLookup {
                provider: descriptor.id.clone(),
                transaction,
            });
        }

        for descriptor in self.registry.all() {
            match self
                .with_timeout(descriptor.client.query_transaction(transaction_id))
                .await
            {
                Ok(transaction) => {
                    return Ok(TransactionLookup {
                        provider: descriptor.id.clone(),
                        transaction,
                    })
                }
                Err(err) => {
                    tracing::debug!(
                        "Transaction {} not recognized by {}: {}",
                        transaction_id,
                        descriptor.id,
                        err
                    );
                }
            }
        }

        Err(AppError::NotFound(format!(
            "Transaction {transaction_id} not found in any provider"
        )))
    }

    /// Verify a meter against the first electricity provider that carries
    /// the optional meter-verification capability.
    pub async fn verify_meter(
        &self,
        service_id: &str,
        meter_number: &str,
        meter_type: &str,
    ) -> Result<MeterVerification> {
        let candidates: Vec<&ProviderDescriptor> = self
            .registry
            .providers_for(ServiceType::Electricity)
            .into_iter()
            .filter(|d| d.client.supports_meter_verification())
            .collect();

        if candidates.is_empty() {
            return Err(AppError::NotFound(
                "Meter verification is not available from any provider".to_string(),
            ));
        }

        for descriptor in candidates {
            match self
                .with_timeout(
                    descriptor
                        .client
                        .verify_meter(service_id, meter_number, meter_type),
                )
                .await
            {
                Ok(meter) => {
                    return Ok(MeterVerification {
                        provider: descriptor.id.clone(),
                        meter,
                    })
                }
                Err(err) => {
                    tracing::warn!("Meter verification via {} failed: {}", descriptor.id, err);
                }
            }
        }

        Err(AppError::NotFound(format!(
            "Meter {meter_number} could not be verified by any provider"
        )))
    }

    /// Route an inbound webhook to its provider. Webhooks are third-party
    /// notifications, so an unknown provider key is logged and ignored.
    pub async fn dispatch_webhook(&self, provider_key: &str, payload: serde_json::Value) {
        match self.registry.provider_by_id(provider_key) {
            None => {
                tracing::warn!("Webhook for unrecognized provider '{}' ignored", provider_key);
            }
            Some(descriptor) => {
                if let Err(err) = descriptor.client.handle_webhook(payload).await {
                    tracing::warn!("Webhook handling by {} failed: {}", descriptor.id, err);
                }
            }
        }
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = ProviderResult<T>>,
    ) -> ProviderResult<T> {
        match tokio::time::timeout(self.provider_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.provider_timeout.as_millis() as u64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::providers::{
        ProviderClient, ProviderPricing, PurchaseOutcome,
    };
    use crate::models::AttemptOutcome;
    use crate::services::registry::{ProviderDescriptor, ProviderStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TEST_TIMEOUT: Duration = Duration::from_millis(200);

    /// Scripted test double: fails or succeeds on purchase, counts calls.
    struct ScriptedClient {
        id: &'static str,
        prefix: &'static str,
        fail_purchase: bool,
        hang: bool,
        purchase_calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn succeeding(id: &'static str, prefix: &'static str) -> Self {
            Self {
                id,
                prefix,
                fail_purchase: false,
                hang: false,
                purchase_calls: AtomicUsize::new(0),
            }
        }

        fn failing(id: &'static str, prefix: &'static str) -> Self {
            Self {
                fail_purchase: true,
                ..Self::succeeding(id, prefix)
            }
        }

        fn hanging(id: &'static str, prefix: &'static str) -> Self {
            Self {
                hang: true,
                ..Self::succeeding(id, prefix)
            }
        }
    }

    #[async_trait::async_trait]
    impl ProviderClient for ScriptedClient {
        fn id(&self) -> &'static str {
            self.id
        }

        fn service_code(
            &self,
            service_type: ServiceType,
            _network: Option<Network>,
        ) -> Option<&'static str> {
            match service_type {
                ServiceType::Airtime => Some("airtime"),
                ServiceType::Electricity => Some("power"),
                _ => None,
            }
        }

        async fn purchase(
            &self,
            _code: &str,
            request: &ServiceRequest,
        ) -> ProviderResult<PurchaseOutcome> {
            self.purchase_calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            if self.fail_purchase {
                return Err(ProviderError::Api("upstream says no".to_string()));
            }
            Ok(PurchaseOutcome {
                transaction_id: format!("{}_1", self.prefix),
                amount: request.amount,
                message: "done".to_string(),
            })
        }

        async fn pricing(
            &self,
            code: &str,
            amount: Option<f64>,
        ) -> ProviderResult<ProviderPricing> {
            if self.fail_purchase {
                return Err(ProviderError::Transport("connection refused".to_string()));
            }
            Ok(ProviderPricing {
                service_code: code.to_string(),
                face_amount: amount,
                cost: amount,
                currency: "NGN",
            })
        }

        async fn availability(&self, _code: &str) -> ProviderResult<bool> {
            if self.fail_purchase {
                return Err(ProviderError::Transport("connection refused".to_string()));
            }
            Ok(true)
        }

        async fn query_transaction(
            &self,
            transaction_id: &str,
        ) -> ProviderResult<ProviderTransaction> {
            if !transaction_id.starts_with(self.prefix) {
                return Err(ProviderError::UnknownTransaction(transaction_id.to_string()));
            }
            Ok(ProviderTransaction {
                transaction_id: transaction_id.to_string(),
                status: "delivered".to_string(),
                service_code: "airtime".to_string(),
                amount: 0.0,
            })
        }

        fn supports_meter_verification(&self) -> bool {
            self.prefix == "P1"
        }

        async fn verify_meter(
            &self,
            service_id: &str,
            meter_number: &str,
            meter_type: &str,
        ) -> ProviderResult<MeterInfo> {
            Ok(MeterInfo {
                meter_number: meter_number.to_string(),
                meter_type: meter_type.to_string(),
                customer_name: "TEST".to_string(),
                address: service_id.to_string(),
            })
        }

        async fn handle_webhook(&self, _payload: serde_json::Value) -> ProviderResult<()> {
            Ok(())
        }
    }

    fn descriptor(
        id: &str,
        priority: u32,
        services: Vec<ServiceType>,
        client: Arc<ScriptedClient>,
    ) -> ProviderDescriptor {
        ProviderDescriptor {
            id: id.to_string(),
            name: id.to_uppercase(),
            priority,
            enable_position: priority as usize,
            services,
            commission: 0.02,
            status: ProviderStatus::Active,
            client,
        }
    }

    fn airtime_request() -> ServiceRequest {
        ServiceRequest {
            service_type: ServiceType::Airtime,
            network: Some(Network::Mtn),
            amount: 1_000.0,
            phone: Some("2348012345678".to_string()),
            variation: None,
            meter_number: None,
            meter_type: None,
            iuc_number: None,
        }
    }

    fn aggregator(descriptors: Vec<ProviderDescriptor>) -> TelecomAggregator {
        TelecomAggregator::new(
            Arc::new(ProviderRegistry::from_descriptors(descriptors)),
            TEST_TIMEOUT,
        )
    }

    #[tokio::test]
    async fn fallback_moves_to_second_provider_and_stops() {
        let p1 = Arc::new(ScriptedClient::failing("p1", "P1"));
        let p2 = Arc::new(ScriptedClient::succeeding("p2", "P2"));
        let agg = aggregator(vec![
            descriptor("p1", 1, vec![ServiceType::Airtime], p1.clone()),
            descriptor("p2", 2, vec![ServiceType::Airtime], p2.clone()),
        ]);

        let (response, attempts) = agg.purchase_with_attempts(&airtime_request()).await;

        assert!(response.success);
        assert_eq!(response.provider.as_deref(), Some("p2"));
        assert_eq!(response.status, ResponseStatus::Success);
        assert!((response.commission - 20.0).abs() < f64::EPSILON);

        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].provider_id, "p1");
        assert_eq!(attempts[0].outcome, AttemptOutcome::Failed);
        assert!(attempts[0].error.as_deref().unwrap().contains("upstream says no"));
        assert_eq!(attempts[1].provider_id, "p2");
        assert_eq!(attempts[1].outcome, AttemptOutcome::Success);

        // P1 is never retried after P2 succeeds.
        assert_eq!(p1.purchase_calls.load(Ordering::SeqCst), 1);
        assert_eq!(p2.purchase_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_supporting_provider_fails_without_attempts() {
        let p1 = Arc::new(ScriptedClient::succeeding("p1", "P1"));
        let agg = aggregator(vec![descriptor(
            "p1",
            1,
            vec![ServiceType::Cable],
            p1,
        )]);

        let (response, attempts) = agg.purchase_with_attempts(&airtime_request()).await;

        assert!(!response.success);
        assert_eq!(response.status, ResponseStatus::Failed);
        assert!(response.message.contains("No providers available for airtime on mtn"));
        assert!(attempts.is_empty());
    }

    #[tokio::test]
    async fn exhausted_chain_reports_aggregate_failure() {
        let agg = aggregator(vec![
            descriptor(
                "p1",
                1,
                vec![ServiceType::Airtime],
                Arc::new(ScriptedClient::failing("p1", "P1")),
            ),
            descriptor(
                "p2",
                2,
                vec![ServiceType::Airtime],
                Arc::new(ScriptedClient::failing("p2", "P2")),
            ),
        ]);

        let (response, attempts) = agg.purchase_with_attempts(&airtime_request()).await;

        assert!(!response.success);
        assert_eq!(response.status, ResponseStatus::Failed);
        assert!(response.message.contains("All providers failed"));
        assert_eq!(attempts.len(), 2);
        assert!(attempts.iter().all(|a| a.outcome == AttemptOutcome::Failed));
    }

    #[tokio::test]
    async fn missing_service_code_counts_as_failed_attempt_not_fatal() {
        // p1 declares cable support but its catalogue has no cable code:
        // the attempt is recorded as failed and the chain moves on.
        let agg = aggregator(vec![
            descriptor(
                "p1",
                1,
                vec![ServiceType::Airtime, ServiceType::Cable],
                Arc::new(ScriptedClient::succeeding("p1", "P1")),
            ),
            descriptor(
                "p2",
                2,
                vec![ServiceType::Airtime],
                Arc::new(ScriptedClient::succeeding("p2", "P2")),
            ),
        ]);

        let request = ServiceRequest {
            service_type: ServiceType::Cable,
            network: None,
            amount: 4_000.0,
            phone: None,
            variation: Some("dstv-compact".to_string()),
            meter_number: None,
            meter_type: None,
            iuc_number: Some("7023456789".to_string()),
        };
        let (response, attempts) = agg.purchase_with_attempts(&request).await;

        assert!(!response.success);
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].outcome, AttemptOutcome::Failed);
        assert!(attempts[0].error.as_deref().unwrap().contains("no service code"));
    }

    #[tokio::test]
    async fn hung_provider_times_out_and_chain_continues() {
        let p2 = Arc::new(ScriptedClient::succeeding("p2", "P2"));
        let agg = aggregator(vec![
            descriptor(
                "p1",
                1,
                vec![ServiceType::Airtime],
                Arc::new(ScriptedClient::hanging("p1", "P1")),
            ),
            descriptor("p2", 2, vec![ServiceType::Airtime], p2),
        ]);

        let (response, attempts) = agg.purchase_with_attempts(&airtime_request()).await;

        assert!(response.success);
        assert_eq!(response.provider.as_deref(), Some("p2"));
        assert_eq!(attempts[0].outcome, AttemptOutcome::Failed);
        assert!(attempts[0].error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn pricing_keeps_one_slot_per_provider_including_failures() {
        let agg = aggregator(vec![
            descriptor(
                "p1",
                1,
                vec![ServiceType::Airtime],
                Arc::new(ScriptedClient::failing("p1", "P1")),
            ),
            descriptor(
                "p2",
                2,
                vec![ServiceType::Airtime],
                Arc::new(ScriptedClient::succeeding("p2", "P2")),
            ),
        ]);

        let slots = agg
            .get_pricing(ServiceType::Airtime, Some(Network::Mtn), Some(500.0))
            .await;

        assert_eq!(slots.len(), 2);
        let p1_slot = slots.iter().find(|s| s.provider == "p1").unwrap();
        assert_eq!(p1_slot.status, SlotStatus::Unavailable);
        assert!(p1_slot.error.is_some());
        let p2_slot = slots.iter().find(|s| s.provider == "p2").unwrap();
        assert_eq!(p2_slot.status, SlotStatus::Available);
        assert_eq!(p2_slot.face_amount, Some(500.0));
    }

    #[tokio::test]
    async fn availability_is_overall_available_with_one_healthy_provider() {
        let agg = aggregator(vec![
            descriptor(
                "p1",
                1,
                vec![ServiceType::Airtime],
                Arc::new(ScriptedClient::failing("p1", "P1")),
            ),
            descriptor(
                "p2",
                2,
                vec![ServiceType::Airtime],
                Arc::new(ScriptedClient::succeeding("p2", "P2")),
            ),
        ]);

        let report = agg
            .get_availability(ServiceType::Airtime, Some(Network::Mtn))
            .await;

        assert_eq!(report.availability.len(), 2);
        assert_eq!(report.overall_status, SlotStatus::Available);
    }

    #[tokio::test]
    async fn directed_transaction_lookup_requires_registered_provider() {
        let agg = aggregator(vec![descriptor(
            "p1",
            1,
            vec![ServiceType::Airtime],
            Arc::new(ScriptedClient::succeeding("p1", "P1")),
        )]);

        // Unknown provider id is a hard error even though p1 would
        // recognize the reference.
        let err = agg.query_transaction("P1_1", Some("ghost")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let lookup = agg.query_transaction("P1_1", Some("p1")).await.unwrap();
        assert_eq!(lookup.provider, "p1");
        assert_eq!(lookup.transaction.transaction_id, "P1_1");
    }

    #[tokio::test]
    async fn undirected_lookup_scans_providers_in_order() {
        let agg = aggregator(vec![
            descriptor(
                "p1",
                1,
                vec![ServiceType::Airtime],
                Arc::new(ScriptedClient::succeeding("p1", "P1")),
            ),
            descriptor(
                "p2",
                2,
                vec![ServiceType::Airtime],
                Arc::new(ScriptedClient::succeeding("p2", "P2")),
            ),
        ]);

        let lookup = agg.query_transaction("P2_9", None).await.unwrap();
        assert_eq!(lookup.provider, "p2");

        let err = agg.query_transaction("XX_1", None).await.unwrap_err();
        assert!(err.to_string().contains("not found in any provider"));
    }

    #[tokio::test]
    async fn meter_verification_uses_capability_flag() {
        // P2 supports electricity but not meter verification; P1 carries
        // the capability.
        let agg = aggregator(vec![
            descriptor(
                "p2",
                1,
                vec![ServiceType::Electricity],
                Arc::new(ScriptedClient::succeeding("p2", "P2")),
            ),
            descriptor(
                "p1",
                2,
                vec![ServiceType::Electricity],
                Arc::new(ScriptedClient::succeeding("p1", "P1")),
            ),
        ]);

        let verification = agg
            .verify_meter("ikeja-electric", "45021657890", "prepaid")
            .await
            .unwrap();
        assert_eq!(verification.provider, "p1");
        assert_eq!(verification.meter.meter_number, "45021657890");
    }

    #[tokio::test]
    async fn webhook_with_unknown_provider_is_ignored() {
        let agg = aggregator(vec![descriptor(
            "p1",
            1,
            vec![ServiceType::Airtime],
            Arc::new(ScriptedClient::succeeding("p1", "P1")),
        )]);

        // Must not panic or error; unknown providers are logged and dropped.
        agg.dispatch_webhook("stranger", serde_json::json!({"transaction_id": "X_1"}))
            .await;
        agg.dispatch_webhook("p1", serde_json::json!({"transaction_id": "P1_1"}))
            .await;
    }
}
