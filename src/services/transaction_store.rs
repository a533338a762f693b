use crate::error::Result;
use crate::models::{Network, ServiceType};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// One recorded purchase. Written after a provider confirms success and the
/// wallet debit lands.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub user_id: String,
    pub service_type: ServiceType,
    pub network: Option<Network>,
    pub amount: f64,
    pub commission: f64,
    pub provider: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Persistence port for purchase records. Durable storage is another
/// system's concern.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    async fn record(&self, entry: TransactionRecord) -> Result<()>;

    async fn find(&self, transaction_id: &str) -> Result<Option<TransactionRecord>>;
}

/// In-memory store used in development and tests.
#[derive(Default)]
pub struct InMemoryTransactionStore {
    entries: RwLock<Vec<TransactionRecord>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait::async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn record(&self, entry: TransactionRecord) -> Result<()> {
        tracing::info!(
            "Transaction recorded: id={} user={} provider={} amount={}",
            entry.transaction_id,
            entry.user_id,
            entry.provider,
            entry.amount
        );
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn find(&self, transaction_id: &str) -> Result<Option<TransactionRecord>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|e| e.transaction_id == transaction_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> TransactionRecord {
        TransactionRecord {
            transaction_id: id.to_string(),
            user_id: "user".to_string(),
            service_type: ServiceType::Airtime,
            network: Some(Network::Mtn),
            amount: 500.0,
            commission: 12.5,
            provider: "vtpass".to_string(),
            status: "success".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn records_are_found_by_transaction_id() {
        let store = InMemoryTransactionStore::new();
        store.record(record("VTP_1")).await.unwrap();
        store.record(record("VTP_2")).await.unwrap();

        assert_eq!(store.len().await, 2);
        let found = store.find("VTP_2").await.unwrap().unwrap();
        assert_eq!(found.transaction_id, "VTP_2");
        assert!(store.find("VTP_3").await.unwrap().is_none());
    }
}
