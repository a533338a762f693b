// src/models/mod.rs
pub mod intent;
pub mod service;

// Re-export commonly used types so other modules can use `crate::models::X`
pub use intent::{IntentContext, IntentEntities, IntentKind, TelecomIntent, UserProfile};
pub use service::{
    ApiResponse, AttemptOutcome, Network, ProviderAttempt, ResponseStatus, ServiceRequest,
    ServiceResponse, ServiceType,
};
