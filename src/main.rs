use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod error;
mod integrations;
mod models;
mod services;
mod utils;

use config::Config;
use constants::API_VERSION;
use services::aggregator::TelecomAggregator;
use services::intent_service::IntentService;
use services::registry::ProviderRegistry;
use services::transaction_store::InMemoryTransactionStore;
use services::wallet::InMemoryWallet;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "topup_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Topup Backend Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);

    // The registry is the only long-lived state: built once, immutable,
    // shared behind an Arc.
    let registry = Arc::new(ProviderRegistry::from_config(&config));
    let aggregator = Arc::new(TelecomAggregator::new(
        registry.clone(),
        Duration::from_millis(config.provider_timeout_ms),
    ));
    let intents = Arc::new(IntentService::new(config.clone()));
    let wallet = Arc::new(InMemoryWallet::new(config.wallet_opening_balance));
    let transactions = Arc::new(InMemoryTransactionStore::new());

    let app_state = api::AppState {
        config: config.clone(),
        registry,
        aggregator,
        intents,
        wallet,
        transactions,
    };

    // Build router
    let app = build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    // CORS configuration
    let cors = cors_from_config(&state.config);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Purchases
        .route("/api/v1/purchase", post(api::purchase::purchase))
        .route("/api/v1/ai-purchase", post(api::purchase::ai_purchase))
        // Pricing & availability
        .route("/api/v1/pricing", get(api::pricing::get_pricing))
        .route("/api/v1/availability", get(api::pricing::get_availability))
        // Transactions
        .route(
            "/api/v1/transaction/{id}",
            get(api::transactions::get_transaction),
        )
        // Meter verification
        .route("/api/v1/verify-meter", post(api::meter::verify_meter))
        // Providers
        .route("/api/v1/providers/stats", get(api::providers::get_stats))
        // Webhooks
        .route("/api/v1/webhook/{provider}", post(api::webhooks::receive))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
