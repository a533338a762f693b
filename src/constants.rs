//! Application constants: API version, provider identifiers, default
//! priorities/commissions, and call timeouts referenced across the core.

/// API version string surfaced in startup logs and routing.
pub const API_VERSION: &str = "v1";

// ==================== PROVIDER IDENTIFIERS ====================
// Lowercase ids; these must match the tokens used in `TELECOM_PROVIDER_ORDER`
// and the `DEFAULT_PROVIDER_ORDER` string below.
pub const PROVIDER_VTPASS: &str = "vtpass";
pub const PROVIDER_BILLSPAY: &str = "billspay";
pub const PROVIDER_VTU: &str = "vtu";

// ==================== PROVIDER COMMISSIONS ====================
// Fraction of transaction value attributed to each provider, in [0, 1].
pub const COMMISSION_VTPASS: f64 = 0.03;
pub const COMMISSION_BILLSPAY: f64 = 0.025;
pub const COMMISSION_VTU: f64 = 0.02;

// ==================== REGISTRY DEFAULTS ====================
/// Default comma-separated provider ordering (1-based priority).
pub const DEFAULT_PROVIDER_ORDER: &str = "vtpass,billspay,vtu";

/// Priority assigned to a provider absent from the configured order string.
/// Large so unlisted providers sort after explicitly ordered ones.
pub const DEFAULT_PROVIDER_PRIORITY: u32 = 100;

// ==================== TIMEOUTS ====================
/// Per-provider call timeout, 8s default, env-overridable via PROVIDER_TIMEOUT_MS.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 8000;

/// Timeout for the outbound LLM intent-extraction request.
pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 10;

// ==================== INTENT PARSING ====================
/// Confidence assigned by the rule-based parser fallback.
pub const RULE_PARSER_CONFIDENCE: f64 = 0.5;

// ==================== WALLET ====================
/// Opening balance for a previously unseen wallet user (in-memory ledger).
pub const DEFAULT_WALLET_OPENING_BALANCE: f64 = 100_000.0;
