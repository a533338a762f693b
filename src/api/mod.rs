// src/api/mod.rs

pub mod health;
pub mod meter;
pub mod pricing;
pub mod providers;
pub mod purchase;
pub mod transactions;
pub mod webhooks;

use crate::config::Config;
use crate::services::aggregator::TelecomAggregator;
use crate::services::intent_service::IntentService;
use crate::services::registry::ProviderRegistry;
use crate::services::transaction_store::TransactionStore;
use crate::services::wallet::WalletGateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: Arc<ProviderRegistry>,
    pub aggregator: Arc<TelecomAggregator>,
    pub intents: Arc<IntentService>,
    pub wallet: Arc<dyn WalletGateway>,
    pub transactions: Arc<dyn TransactionStore>,
}
