use crate::models::service::ServiceType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    AirtimePurchase,
    DataPurchase,
    ElectricityPurchase,
    CablePurchase,
    BettingFunding,
    Unknown,
}

impl IntentKind {
    pub fn service_type(&self) -> Option<ServiceType> {
        match self {
            IntentKind::AirtimePurchase => Some(ServiceType::Airtime),
            IntentKind::DataPurchase => Some(ServiceType::Data),
            IntentKind::ElectricityPurchase => Some(ServiceType::Electricity),
            IntentKind::CablePurchase => Some(ServiceType::Cable),
            IntentKind::BettingFunding => Some(ServiceType::Betting),
            IntentKind::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::AirtimePurchase => "airtime_purchase",
            IntentKind::DataPurchase => "data_purchase",
            IntentKind::ElectricityPurchase => "electricity_purchase",
            IntentKind::CablePurchase => "cable_purchase",
            IntentKind::BettingFunding => "betting_funding",
            IntentKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities extracted from a message. Known fields are typed; anything else
/// the extractor produces is carried through `extra` untouched so new entity
/// keys survive older deployments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentEntities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iuc_number: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelecomIntent {
    pub intent: IntentKind,
    pub confidence: f64,
    #[serde(default)]
    pub entities: IntentEntities,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub needs_clarification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification_message: Option<String>,
}

impl TelecomIntent {
    pub fn unknown() -> Self {
        Self {
            intent: IntentKind::Unknown,
            confidence: 0.0,
            entities: IntentEntities::default(),
            suggestions: Vec::new(),
            needs_clarification: true,
            clarification_message: None,
        }
    }
}

/// Conversation context merged into a freshly parsed intent. Context is
/// strictly a gap-filler: extracted data always wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntentContext {
    #[serde(default)]
    pub previous_intent: Option<TelecomIntent>,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_kind_serializes_snake_case() {
        let json = serde_json::to_string(&IntentKind::AirtimePurchase).unwrap();
        assert_eq!(json, "\"airtime_purchase\"");
    }

    #[test]
    fn unknown_entity_keys_pass_through() {
        let parsed: IntentEntities = serde_json::from_str(
            r#"{"network":"mtn","loyalty_tier":"gold"}"#,
        )
        .unwrap();
        assert_eq!(parsed.network.as_deref(), Some("mtn"));
        assert_eq!(
            parsed.extra.get("loyalty_tier").and_then(|v| v.as_str()),
            Some("gold")
        );

        let round_trip = serde_json::to_value(&parsed).unwrap();
        assert_eq!(
            round_trip.get("loyalty_tier").and_then(|v| v.as_str()),
            Some("gold")
        );
    }

    #[test]
    fn intent_deserializes_with_minimal_fields() {
        let intent: TelecomIntent =
            serde_json::from_str(r#"{"intent":"data_purchase","confidence":0.8}"#).unwrap();
        assert_eq!(intent.intent, IntentKind::DataPurchase);
        assert!(!intent.needs_clarification);
        assert!(intent.suggestions.is_empty());
    }
}
