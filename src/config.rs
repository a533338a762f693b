use crate::constants::{
    DEFAULT_PROVIDER_ORDER, DEFAULT_PROVIDER_TIMEOUT_MS, DEFAULT_WALLET_OPENING_BALANCE,
};
use crate::utils::flag_is_set;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Providers
    pub vtpass_enabled: bool,
    pub billspay_enabled: bool,
    pub vtu_enabled: bool,
    pub vtpass_api_key: Option<String>,
    pub billspay_api_key: Option<String>,
    pub vtu_api_key: Option<String>,
    pub telecom_provider_order: String,
    pub provider_timeout_ms: u64,

    // LLM intent extraction
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,

    // Wallet (in-memory ledger)
    pub wallet_opening_balance: f64,

    // CORS
    pub cors_allowed_origins: String,
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name).map(|v| flag_is_set(&v)).unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            vtpass_enabled: env_flag("VTPASS_ENABLED", true),
            billspay_enabled: env_flag("BILLSPAY_ENABLED", true),
            vtu_enabled: env_flag("VTU_ENABLED", true),
            vtpass_api_key: env::var("VTPASS_API_KEY").ok(),
            billspay_api_key: env::var("BILLSPAY_API_KEY").ok(),
            vtu_api_key: env::var("VTU_API_KEY").ok(),
            telecom_provider_order: env::var("TELECOM_PROVIDER_ORDER")
                .unwrap_or_else(|_| DEFAULT_PROVIDER_ORDER.to_string()),
            provider_timeout_ms: env::var("PROVIDER_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_MS),

            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),

            wallet_opening_balance: env::var("WALLET_OPENING_BALANCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_WALLET_OPENING_BALANCE),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.vtpass_enabled && !self.billspay_enabled && !self.vtu_enabled {
            anyhow::bail!("No telecom provider is enabled; enable at least one of VTPASS_ENABLED, BILLSPAY_ENABLED, VTU_ENABLED");
        }

        if self.telecom_provider_order.trim().is_empty() {
            tracing::warn!("TELECOM_PROVIDER_ORDER is empty; all providers fall back to the default priority");
        }

        if self.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; intent parsing will use the rule-based extractor only");
        }

        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        let _ = &self.vtpass_api_key;
        let _ = &self.billspay_api_key;
        let _ = &self.vtu_api_key;

        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            vtpass_enabled: true,
            billspay_enabled: true,
            vtu_enabled: true,
            vtpass_api_key: None,
            billspay_api_key: None,
            vtu_api_key: None,
            telecom_provider_order: DEFAULT_PROVIDER_ORDER.to_string(),
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            openai_api_key: None,
            openai_api_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            wallet_opening_balance: DEFAULT_WALLET_OPENING_BALANCE,
            cors_allowed_origins: "*".to_string(),
        }
    }

    #[test]
    fn validate_accepts_default_configuration() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_all_providers_disabled() {
        let config = Config {
            vtpass_enabled: false,
            billspay_enabled: false,
            vtu_enabled: false,
            ..base_config()
        };
        assert!(config.validate().is_err());
    }
}
