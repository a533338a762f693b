use crate::config::Config;
use crate::constants::{LLM_REQUEST_TIMEOUT_SECS, RULE_PARSER_CONFIDENCE};
use crate::models::{
    IntentContext, IntentEntities, IntentKind, Network, ServiceRequest, TelecomIntent,
};
use crate::utils::normalize_phone_number;
use serde::Deserialize;
use std::time::Duration;

// Digit runs this long are phone numbers, not purchase amounts.
const PHONE_LENGTH_THRESHOLD: usize = 7;

const EXTRACTION_PROMPT: &str = r#"You extract purchase intents for a Nigerian prepaid utility platform.
Reply with a single JSON object and nothing else, matching exactly:
{"intent": one of ["airtime_purchase","data_purchase","electricity_purchase","cable_purchase","betting_funding","unknown"],
 "confidence": number between 0 and 1,
 "entities": {"network"?: one of ["mtn","airtel","glo","9mobile"], "amount"?: number, "phone"?: string, "data_plan"?: string, "meter_number"?: string, "iuc_number"?: string}}
Only include entities that are explicitly present in the message. Do not guess."#;

// ==================== RULE-BASED EXTRACTION ====================

fn tokenize_words(text: &str) -> Vec<String> {
    // '.' survives splitting so plan sizes like "1.5gb" stay one token.
    text.split(|c: char| !c.is_ascii_alphanumeric() && c != '.')
        .map(|token| token.trim_matches('.'))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_ascii_lowercase())
        .collect()
}

fn contains_any_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// First purchase-sized number in the text. Bare or currency-decorated
/// numbers only ("200", "₦1,000", "500naira"); digit runs long enough to be
/// phone numbers are skipped, as are tokens where digits are glued to other
/// words ("2gb", "bet9ja", "9mobile").
fn extract_amount_from_text(text: &str) -> Option<f64> {
    text.split_whitespace().find_map(|word| {
        let cleaned: String = word
            .chars()
            .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == ',')
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        let residue: String = word
            .chars()
            .filter(|ch| !ch.is_ascii_digit() && *ch != '.' && *ch != ',')
            .collect::<String>()
            .to_lowercase();
        if !matches!(residue.as_str(), "" | "₦" | "n" | "ngn" | "naira") {
            return None;
        }
        let digit_count = cleaned.chars().filter(|c| c.is_ascii_digit()).count();
        if digit_count >= PHONE_LENGTH_THRESHOLD {
            return None;
        }
        cleaned
            .trim_matches(|c| c == '.' || c == ',')
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value > 0.0)
    })
}

/// First token that canonicalizes to a Nigerian phone number.
fn extract_phone_from_text(text: &str) -> Option<String> {
    text.split_whitespace().find_map(|word| {
        let digits: String = word.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() < 10 {
            return None;
        }
        normalize_phone_number(&digits)
    })
}

fn extract_network_from_text(text: &str) -> Option<String> {
    for word in tokenize_words(text) {
        let network = match word.as_str() {
            "mtn" => Some("mtn"),
            "airtel" => Some("airtel"),
            "glo" => Some("glo"),
            "9mobile" | "etisalat" => Some("9mobile"),
            _ => None,
        };
        if let Some(network) = network {
            return Some(network.to_string());
        }
    }
    None
}

/// Data plan sizes like "2gb", "1.5gb", "500mb", also split across two
/// tokens ("2 gb").
fn extract_data_plan_from_text(text: &str) -> Option<String> {
    let words = tokenize_words(text);
    for (idx, word) in words.iter().enumerate() {
        for unit in ["gb", "mb"] {
            if let Some(size) = word.strip_suffix(unit) {
                if !size.is_empty() && size.parse::<f64>().is_ok() {
                    return Some(format!("{size}{unit}"));
                }
            }
            if word == unit && idx > 0 && words[idx - 1].parse::<f64>().is_ok() {
                return Some(format!("{}{}", words[idx - 1], unit));
            }
        }
    }
    None
}

fn extract_meter_number_from_text(text: &str) -> Option<String> {
    // Meters are 10-13 digit references that are not valid phone numbers.
    text.split_whitespace().find_map(|word| {
        let digits: String = word.chars().filter(|c| c.is_ascii_digit()).collect();
        if (10..=13).contains(&digits.len()) && normalize_phone_number(&digits).is_none() {
            Some(digits)
        } else {
            None
        }
    })
}

/// Deterministic keyword fallback used whenever LLM extraction is
/// unavailable or returns something unusable.
pub fn parse_intent_with_rules(message: &str) -> TelecomIntent {
    let lower = message.to_lowercase();

    let intent = if contains_any_keyword(&lower, &["airtime", "recharge", "top up", "topup"]) {
        IntentKind::AirtimePurchase
    } else if contains_any_keyword(&lower, &["data", "gb", "mb"]) {
        IntentKind::DataPurchase
    } else if contains_any_keyword(&lower, &["electricity", "meter", "nepa"]) {
        IntentKind::ElectricityPurchase
    } else if contains_any_keyword(&lower, &["dstv", "gotv", "cable", "startimes"]) {
        IntentKind::CablePurchase
    } else if contains_any_keyword(&lower, &["bet"]) {
        IntentKind::BettingFunding
    } else {
        IntentKind::Unknown
    };

    let mut entities = IntentEntities {
        network: extract_network_from_text(&lower),
        amount: extract_amount_from_text(&lower),
        phone: extract_phone_from_text(&lower),
        ..IntentEntities::default()
    };

    match intent {
        IntentKind::DataPurchase => {
            entities.data_plan = extract_data_plan_from_text(&lower);
        }
        IntentKind::ElectricityPurchase => {
            entities.meter_number = extract_meter_number_from_text(&lower);
        }
        _ => {}
    }

    TelecomIntent {
        intent,
        confidence: RULE_PARSER_CONFIDENCE,
        entities,
        suggestions: Vec::new(),
        needs_clarification: true,
        clarification_message: None,
    }
}

// ==================== VALIDATION / ENHANCEMENT ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Network,
    Amount,
    Phone,
    DataPlan,
    MeterNumber,
    IucNumber,
}

/// Drop malformed entities; unknown keys in `extra` pass through untouched.
fn normalize_entities(entities: &mut IntentEntities) {
    if let Some(phone) = entities.phone.take() {
        entities.phone = normalize_phone_number(&phone);
    }
    if let Some(network) = entities.network.take() {
        let lower = network.trim().to_ascii_lowercase();
        if matches!(lower.as_str(), "mtn" | "airtel" | "glo" | "9mobile") {
            entities.network = Some(lower);
        }
    }
    if let Some(amount) = entities.amount.take() {
        if amount.is_finite() && amount > 0.0 {
            entities.amount = Some(amount);
        }
    }
}

/// Context fills gaps only; freshly extracted entities always win.
fn merge_context(entities: &mut IntentEntities, context: &IntentContext) {
    if let Some(previous) = &context.previous_intent {
        let prev = &previous.entities;
        entities.network = entities.network.take().or_else(|| prev.network.clone());
        entities.amount = entities.amount.or(prev.amount);
        entities.phone = entities.phone.take().or_else(|| prev.phone.clone());
        entities.data_plan = entities.data_plan.take().or_else(|| prev.data_plan.clone());
        entities.meter_number = entities
            .meter_number
            .take()
            .or_else(|| prev.meter_number.clone());
        entities.iuc_number = entities
            .iuc_number
            .take()
            .or_else(|| prev.iuc_number.clone());
    }
    if let Some(profile) = &context.user_profile {
        entities.phone = entities.phone.take().or_else(|| profile.phone.clone());
        entities.network = entities.network.take().or_else(|| profile.network.clone());
    }
}

/// The first missing required entity, in the fixed per-intent asking order.
fn first_missing_entity(intent: IntentKind, entities: &IntentEntities) -> Option<Slot> {
    let missing = |slot: Slot| -> bool {
        match slot {
            Slot::Network => entities.network.is_none(),
            Slot::Amount => entities.amount.is_none(),
            Slot::Phone => entities.phone.is_none(),
            Slot::DataPlan => entities.data_plan.is_none() && entities.amount.is_none(),
            Slot::MeterNumber => entities.meter_number.is_none(),
            Slot::IucNumber => entities.iuc_number.is_none(),
        }
    };

    let order: &[Slot] = match intent {
        IntentKind::AirtimePurchase => &[Slot::Network, Slot::Amount, Slot::Phone],
        IntentKind::DataPurchase => &[Slot::Network, Slot::DataPlan, Slot::Phone],
        IntentKind::ElectricityPurchase => &[Slot::MeterNumber, Slot::Amount],
        IntentKind::CablePurchase => &[Slot::IucNumber, Slot::Amount],
        IntentKind::BettingFunding => &[Slot::Amount, Slot::Phone],
        IntentKind::Unknown => &[],
    };

    order.iter().copied().find(|slot| missing(*slot))
}

/// One targeted question per call; never combined.
fn clarification_question(intent: IntentKind, slot: Slot) -> String {
    match (intent, slot) {
        (IntentKind::AirtimePurchase, Slot::Network)
        | (IntentKind::DataPurchase, Slot::Network) => {
            "Which network is this for (MTN, Airtel, Glo, or 9mobile)?".to_string()
        }
        (IntentKind::AirtimePurchase, Slot::Amount) => {
            "How much airtime would you like to buy?".to_string()
        }
        (IntentKind::AirtimePurchase, Slot::Phone) | (IntentKind::DataPurchase, Slot::Phone) => {
            "Which phone number should receive it?".to_string()
        }
        (IntentKind::DataPurchase, Slot::DataPlan) => {
            "Which data plan do you want (e.g. 1GB, 2GB), or how much should I spend?".to_string()
        }
        (IntentKind::ElectricityPurchase, Slot::MeterNumber) => {
            "What is the meter number?".to_string()
        }
        (IntentKind::ElectricityPurchase, Slot::Amount) => {
            "How much electricity credit should I buy?".to_string()
        }
        (IntentKind::CablePurchase, Slot::IucNumber) => {
            "What is the smartcard/IUC number?".to_string()
        }
        (IntentKind::CablePurchase, Slot::Amount) => {
            "How much is the subscription package?".to_string()
        }
        (IntentKind::BettingFunding, Slot::Amount) => {
            "How much should I fund the betting wallet with?".to_string()
        }
        (IntentKind::BettingFunding, Slot::Phone) => {
            "What is the betting account/customer id?".to_string()
        }
        _ => "Could you share a bit more detail about what you want to buy?".to_string(),
    }
}

/// Validation, context merge and clarification decision applied to every
/// parsed intent regardless of which parser produced it.
fn finalize_intent(mut intent: TelecomIntent, context: Option<&IntentContext>) -> TelecomIntent {
    intent.confidence = intent.confidence.clamp(0.0, 1.0);

    normalize_entities(&mut intent.entities);
    if let Some(context) = context {
        merge_context(&mut intent.entities, context);
        // Context values are user-supplied too; hold them to the same bar.
        normalize_entities(&mut intent.entities);
    }

    if intent.intent == IntentKind::Unknown {
        intent.needs_clarification = true;
        intent.clarification_message = Some(
            "I can help you buy airtime, data, electricity, cable TV, or fund a betting wallet. What would you like to do?"
                .to_string(),
        );
        if intent.suggestions.is_empty() {
            intent.suggestions = vec![
                "Buy 500 naira MTN airtime for 08012345678".to_string(),
                "Buy 2GB Glo data".to_string(),
                "Buy electricity for meter 45021657890".to_string(),
            ];
        }
        return intent;
    }

    match first_missing_entity(intent.intent, &intent.entities) {
        Some(slot) => {
            intent.needs_clarification = true;
            intent.clarification_message = Some(clarification_question(intent.intent, slot));
        }
        None => {
            intent.needs_clarification = false;
            intent.clarification_message = None;
        }
    }

    intent
}

// ==================== LLM-BACKED PARSER ====================

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Model output hygiene: tolerate markdown fences around the JSON object.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

/// Intent Service - turns free text into a validated `TelecomIntent`,
/// preferring LLM extraction and recovering with the rule-based parser.
pub struct IntentService {
    config: Config,
    http: reqwest::Client,
}

impl IntentService {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(LLM_REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { config, http }
    }

    /// Always succeeds. Parse degradation (LLM unavailable, malformed
    /// output) is absorbed here and never surfaced to the caller.
    pub async fn parse(&self, message: &str, context: Option<&IntentContext>) -> TelecomIntent {
        let parsed = match self.parse_with_llm(message).await {
            Ok(intent) => intent,
            Err(err) => {
                tracing::debug!("LLM intent extraction unavailable ({}), using rule parser", err);
                parse_intent_with_rules(message)
            }
        };
        finalize_intent(parsed, context)
    }

    async fn parse_with_llm(&self, message: &str) -> anyhow::Result<TelecomIntent> {
        let api_key = self
            .config
            .openai_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no LLM provider configured"))?;

        let body = serde_json::json!({
            "model": self.config.openai_model,
            "temperature": 0,
            "messages": [
                {"role": "system", "content": EXTRACTION_PROMPT},
                {"role": "user", "content": message},
            ],
        });

        let response = self
            .http
            .post(format!(
                "{}/chat/completions",
                self.config.openai_api_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| anyhow::anyhow!("completion carried no choices"))?;

        let intent: TelecomIntent = serde_json::from_str(strip_code_fences(content))?;
        Ok(intent)
    }
}

// ==================== INTENT → REQUEST CONVERSION ====================

/// Deterministic, side-effect-free mapping from a resolved intent to a
/// provider-agnostic request. This is the single gate that prevents acting
/// on incomplete intents: `None` for unknown or unclarified intents, and no
/// defaults are invented for missing entities.
pub fn convert_intent_to_service_request(intent: &TelecomIntent) -> Option<ServiceRequest> {
    if intent.needs_clarification || intent.intent == IntentKind::Unknown {
        return None;
    }
    let service_type = intent.intent.service_type()?;
    let entities = &intent.entities;

    let request = match intent.intent {
        IntentKind::AirtimePurchase => ServiceRequest {
            service_type,
            network: Network::parse(entities.network.as_deref()?),
            amount: entities.amount?,
            phone: entities.phone.clone(),
            variation: None,
            meter_number: None,
            meter_type: None,
            iuc_number: None,
        },
        IntentKind::DataPurchase => ServiceRequest {
            service_type,
            network: Network::parse(entities.network.as_deref()?),
            // A named plan resolves the price upstream; amount may be 0.
            amount: entities.amount.unwrap_or(0.0),
            phone: entities.phone.clone(),
            variation: entities.data_plan.clone(),
            meter_number: None,
            meter_type: None,
            iuc_number: None,
        },
        IntentKind::ElectricityPurchase => ServiceRequest {
            service_type,
            network: entities.network.as_deref().and_then(Network::parse),
            amount: entities.amount?,
            phone: entities.phone.clone(),
            variation: None,
            meter_number: entities.meter_number.clone(),
            meter_type: None,
            iuc_number: None,
        },
        IntentKind::CablePurchase => ServiceRequest {
            service_type,
            network: None,
            amount: entities.amount?,
            phone: entities.phone.clone(),
            variation: entities.data_plan.clone(),
            meter_number: None,
            meter_type: None,
            iuc_number: entities.iuc_number.clone(),
        },
        IntentKind::BettingFunding => ServiceRequest {
            service_type,
            network: None,
            amount: entities.amount?,
            phone: entities.phone.clone(),
            variation: None,
            meter_number: None,
            meter_type: None,
            iuc_number: None,
        },
        IntentKind::Unknown => return None,
    };

    // Airtime/data must resolve to a real network after validation.
    if matches!(
        intent.intent,
        IntentKind::AirtimePurchase | IntentKind::DataPurchase
    ) && request.network.is_none()
    {
        return None;
    }

    Some(request)
}
