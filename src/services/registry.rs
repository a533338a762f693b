use crate::config::Config;
use crate::constants::{
    COMMISSION_BILLSPAY, COMMISSION_VTPASS, COMMISSION_VTU, DEFAULT_PROVIDER_PRIORITY,
};
use crate::integrations::providers::{
    BillsPayClient, ProviderClient, VtPassClient, VtuNgClient,
};
use crate::models::ServiceType;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

// ==================== DESCRIPTORS ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Active,
    Inactive,
    Maintenance,
}

/// One registered upstream operator. Built once at startup, read-only after.
pub struct ProviderDescriptor {
    pub id: String,
    pub name: String,
    /// 1 is the highest priority; providers missing from the configured
    /// order string get `DEFAULT_PROVIDER_PRIORITY`.
    pub priority: u32,
    /// Position in the enablement order; first tie-break for equal priority.
    pub enable_position: usize,
    pub services: Vec<ServiceType>,
    pub commission: f64,
    pub status: ProviderStatus,
    pub client: Arc<dyn ProviderClient>,
}

impl ProviderDescriptor {
    pub fn supports(&self, service_type: ServiceType) -> bool {
        self.services.contains(&service_type)
    }
}

/// Registry snapshot row for the stats endpoint.
#[derive(Debug, Serialize)]
pub struct ProviderStats {
    pub id: String,
    pub name: String,
    pub priority: u32,
    pub services: Vec<ServiceType>,
    pub commission: f64,
    pub status: ProviderStatus,
}

// ==================== REGISTRY ====================

/// Ordered, immutable set of enabled providers. The only long-lived state in
/// the core; shared across requests behind an `Arc` without locking.
pub struct ProviderRegistry {
    providers: Vec<ProviderDescriptor>,
}

impl ProviderRegistry {
    pub fn from_config(config: &Config) -> Self {
        let order = parse_provider_order(&config.telecom_provider_order);
        let mut providers = Vec::new();

        if config.vtpass_enabled {
            providers.push(descriptor(
                crate::constants::PROVIDER_VTPASS,
                "VTPass",
                vec![
                    ServiceType::Airtime,
                    ServiceType::Data,
                    ServiceType::Electricity,
                    ServiceType::Cable,
                ],
                COMMISSION_VTPASS,
                Arc::new(VtPassClient::new(config.vtpass_api_key.clone())),
                &order,
                providers.len(),
            ));
        }
        if config.billspay_enabled {
            providers.push(descriptor(
                crate::constants::PROVIDER_BILLSPAY,
                "BillsPay",
                vec![
                    ServiceType::Airtime,
                    ServiceType::Data,
                    ServiceType::Electricity,
                    ServiceType::Betting,
                ],
                COMMISSION_BILLSPAY,
                Arc::new(BillsPayClient::new(config.billspay_api_key.clone())),
                &order,
                providers.len(),
            ));
        }
        if config.vtu_enabled {
            providers.push(descriptor(
                crate::constants::PROVIDER_VTU,
                "VTU.ng",
                vec![ServiceType::Airtime, ServiceType::Data],
                COMMISSION_VTU,
                Arc::new(VtuNgClient::new(config.vtu_api_key.clone())),
                &order,
                providers.len(),
            ));
        }

        for id in order.keys() {
            if !providers.iter().any(|p| &p.id == id) {
                tracing::warn!(
                    "TELECOM_PROVIDER_ORDER names '{}' but that provider is not enabled",
                    id
                );
            }
        }

        Self::from_descriptors(providers)
    }

    /// Sorts once at construction so every read path sees the same stable
    /// order: priority, then enablement position, then id.
    pub fn from_descriptors(mut providers: Vec<ProviderDescriptor>) -> Self {
        providers.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.enable_position.cmp(&b.enable_position))
                .then_with(|| a.id.cmp(&b.id))
        });
        tracing::info!(
            "Provider registry initialized: [{}]",
            providers
                .iter()
                .map(|p| format!("{}(prio {})", p.id, p.priority))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self { providers }
    }

    pub fn providers_for(&self, service_type: ServiceType) -> Vec<&ProviderDescriptor> {
        self.providers
            .iter()
            .filter(|p| p.status == ProviderStatus::Active && p.supports(service_type))
            .collect()
    }

    pub fn provider_by_id(&self, id: &str) -> Option<&ProviderDescriptor> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn all(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    pub fn snapshot(&self) -> Vec<ProviderStats> {
        self.providers
            .iter()
            .map(|p| ProviderStats {
                id: p.id.clone(),
                name: p.name.clone(),
                priority: p.priority,
                services: p.services.clone(),
                commission: p.commission,
                status: p.status,
            })
            .collect()
    }
}

fn descriptor(
    id: &str,
    name: &str,
    services: Vec<ServiceType>,
    commission: f64,
    client: Arc<dyn ProviderClient>,
    order: &HashMap<String, u32>,
    enable_position: usize,
) -> ProviderDescriptor {
    ProviderDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        priority: order.get(id).copied().unwrap_or(DEFAULT_PROVIDER_PRIORITY),
        enable_position,
        services,
        commission,
        status: ProviderStatus::Active,
        client,
    }
}

/// Parse `TELECOM_PROVIDER_ORDER` ("vtpass,billspay,vtu") into id → priority,
/// 1-based. Duplicates keep their first position.
fn parse_provider_order(raw: &str) -> HashMap<String, u32> {
    let mut order = HashMap::new();
    for (index, id) in raw
        .split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .enumerate()
    {
        order.entry(id).or_insert(index as u32 + 1);
    }
    order
}
