pub mod aggregator;
pub mod intent_service;
pub mod registry;
pub mod transaction_store;
pub mod wallet;
