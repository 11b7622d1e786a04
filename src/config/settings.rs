//! Oracle configuration settings and environment variable handling

use alloy::primitives::Address;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::env;
use std::str::FromStr;
use tracing::warn;
use crate::types::DEFAULT_TRUST_LIST;

// Rule engine defaults
pub const DEFAULT_LIQUIDITY_RATIO: Decimal = dec!(0.05);
pub const MAX_LIQUIDITY_RATIO: Decimal = dec!(1);
pub const DEFAULT_PRICE_DEVIATION_PCT: Decimal = dec!(50);
pub const MIN_PRICE_DEVIATION_PCT: Decimal = dec!(1);
pub const DEFAULT_ESCROW_ASYMMETRY_RATIO: Decimal = dec!(1.5);
pub const MIN_ESCROW_ASYMMETRY_RATIO: Decimal = dec!(1);
pub const DEFAULT_ESCROW_MIN_VALUE_USD: Decimal = dec!(10);

// Market feed defaults
pub const DEFAULT_PRICE_FEED_ID: &str = "ethereum";
pub const DEFAULT_FALLBACK_PRICE_USD: Decimal = dec!(2500);

// Upstream endpoints
pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const GOPLUS_BASE_URL: &str = "https://api.gopluslabs.io/api/v1";
pub const BASESCAN_BASE_URL: &str = "https://api.basescan.org/api";
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-4o-mini";
pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

// Timeouts
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 30;
pub const MAX_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_SOURCE_SNIPPET_CHARS: usize = 12_000;
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

// Anvil account #0. Public demo key, never fund it.
pub const DEMO_SIGNER_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Thresholds consumed by the deterministic rule engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleThresholds {
    /// volume24h / marketCap below this sets the liquidity flag
    pub liquidity_ratio: Decimal,
    /// |asking - market| / market in percent
    pub price_deviation_pct: Decimal,
    pub escrow_asymmetry_ratio: Decimal,
    pub escrow_min_value_usd: Decimal,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            liquidity_ratio: DEFAULT_LIQUIDITY_RATIO,
            price_deviation_pct: DEFAULT_PRICE_DEVIATION_PCT,
            escrow_asymmetry_ratio: DEFAULT_ESCROW_ASYMMETRY_RATIO,
            escrow_min_value_usd: DEFAULT_ESCROW_MIN_VALUE_USD,
        }
    }
}

/// One OpenAI-compatible chat completion backend.
#[derive(Debug, Clone)]
pub struct ClassifierBackendConfig {
    pub name: String,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Signal feeds
    pub coingecko_api_key: Option<String>,
    pub coingecko_base_url: String,
    pub goplus_access_token: Option<String>,
    pub goplus_base_url: String,
    pub basescan_api_key: Option<String>,
    pub basescan_base_url: String,
    // AI cluster
    pub classifiers: Vec<ClassifierBackendConfig>,
    // Rule engine
    pub trust_list: HashSet<Address>,
    pub thresholds: RuleThresholds,
    // Market fallback
    pub default_price_feed_id: String,
    pub baseline_price_feed_id: String,
    pub fallback_price_usd: Option<Decimal>,
    // Transport
    pub fetch_timeout_secs: u64,
    pub classifier_timeout_secs: u64,
    pub source_snippet_chars: usize,
    // Signing
    pub signer_private_key: String,
    // Server
    pub server_addr: String,
}

impl Config {
    pub fn load() -> Self {
        let defaults = Self::default();

        Self {
            coingecko_api_key: non_empty_var("COINGECKO_API_KEY"),
            coingecko_base_url: env::var("COINGECKO_BASE_URL")
                .unwrap_or(defaults.coingecko_base_url),
            goplus_access_token: non_empty_var("GOPLUS_ACCESS_TOKEN"),
            goplus_base_url: env::var("GOPLUS_BASE_URL")
                .unwrap_or(defaults.goplus_base_url),
            basescan_api_key: non_empty_var("BASESCAN_API_KEY"),
            basescan_base_url: env::var("BASESCAN_BASE_URL")
                .unwrap_or(defaults.basescan_base_url),
            classifiers: vec![
                ClassifierBackendConfig {
                    name: "openai".to_string(),
                    model: env::var("OPENAI_MODEL").unwrap_or_else(|_| OPENAI_MODEL.to_string()),
                    endpoint: env::var("OPENAI_ENDPOINT").unwrap_or_else(|_| OPENAI_ENDPOINT.to_string()),
                    api_key: non_empty_var("OPENAI_API_KEY"),
                },
                ClassifierBackendConfig {
                    name: "groq".to_string(),
                    model: env::var("GROQ_MODEL").unwrap_or_else(|_| GROQ_MODEL.to_string()),
                    endpoint: env::var("GROQ_ENDPOINT").unwrap_or_else(|_| GROQ_ENDPOINT.to_string()),
                    api_key: non_empty_var("GROQ_API_KEY"),
                },
            ],
            trust_list: env::var("TRUST_LIST")
                .ok()
                .map(|s| parse_trust_list(&s))
                .unwrap_or(defaults.trust_list),
            thresholds: RuleThresholds {
                liquidity_ratio: decimal_var("LIQUIDITY_RATIO_THRESHOLD")
                    .unwrap_or(DEFAULT_LIQUIDITY_RATIO)
                    .max(Decimal::ZERO)
                    .min(MAX_LIQUIDITY_RATIO),
                price_deviation_pct: decimal_var("PRICE_DEVIATION_THRESHOLD_PCT")
                    .unwrap_or(DEFAULT_PRICE_DEVIATION_PCT)
                    .max(MIN_PRICE_DEVIATION_PCT),
                escrow_asymmetry_ratio: decimal_var("ESCROW_ASYMMETRY_RATIO")
                    .unwrap_or(DEFAULT_ESCROW_ASYMMETRY_RATIO)
                    .max(MIN_ESCROW_ASYMMETRY_RATIO),
                escrow_min_value_usd: decimal_var("ESCROW_MIN_VALUE_USD")
                    .unwrap_or(DEFAULT_ESCROW_MIN_VALUE_USD)
                    .max(Decimal::ZERO),
            },
            default_price_feed_id: env::var("DEFAULT_PRICE_FEED_ID")
                .unwrap_or(defaults.default_price_feed_id),
            baseline_price_feed_id: env::var("BASELINE_PRICE_FEED_ID")
                .unwrap_or(defaults.baseline_price_feed_id),
            // An empty FALLBACK_PRICE_USD disables the demo fallback
            fallback_price_usd: match env::var("FALLBACK_PRICE_USD") {
                Ok(s) if s.trim().is_empty() => None,
                Ok(s) => Decimal::from_str(s.trim()).ok().filter(|p| *p > Decimal::ZERO),
                Err(_) => defaults.fallback_price_usd,
            },
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS)
                .max(1)
                .min(MAX_TIMEOUT_SECS),
            classifier_timeout_secs: env::var("CLASSIFIER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CLASSIFIER_TIMEOUT_SECS)
                .max(1)
                .min(MAX_TIMEOUT_SECS),
            source_snippet_chars: env::var("SOURCE_SNIPPET_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SOURCE_SNIPPET_CHARS),
            signer_private_key: non_empty_var("ORACLE_SIGNER_KEY")
                .unwrap_or(defaults.signer_private_key),
            server_addr: env::var("SERVER_ADDR")
                .unwrap_or(defaults.server_addr),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coingecko_api_key: None,
            coingecko_base_url: COINGECKO_BASE_URL.to_string(),
            goplus_access_token: None,
            goplus_base_url: GOPLUS_BASE_URL.to_string(),
            basescan_api_key: None,
            basescan_base_url: BASESCAN_BASE_URL.to_string(),
            classifiers: vec![
                ClassifierBackendConfig {
                    name: "openai".to_string(),
                    model: OPENAI_MODEL.to_string(),
                    endpoint: OPENAI_ENDPOINT.to_string(),
                    api_key: None,
                },
                ClassifierBackendConfig {
                    name: "groq".to_string(),
                    model: GROQ_MODEL.to_string(),
                    endpoint: GROQ_ENDPOINT.to_string(),
                    api_key: None,
                },
            ],
            trust_list: DEFAULT_TRUST_LIST.iter().copied().collect(),
            thresholds: RuleThresholds::default(),
            default_price_feed_id: DEFAULT_PRICE_FEED_ID.to_string(),
            baseline_price_feed_id: DEFAULT_PRICE_FEED_ID.to_string(),
            fallback_price_usd: Some(DEFAULT_FALLBACK_PRICE_USD),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            classifier_timeout_secs: DEFAULT_CLASSIFIER_TIMEOUT_SECS,
            source_snippet_chars: DEFAULT_SOURCE_SNIPPET_CHARS,
            signer_private_key: DEMO_SIGNER_KEY.to_string(),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty() && v != "undefined")
}

fn decimal_var(key: &str) -> Option<Decimal> {
    env::var(key).ok().and_then(|s| Decimal::from_str(s.trim()).ok())
}

/// Parses a comma separated address list, skipping entries that are not addresses.
pub fn parse_trust_list(raw: &str) -> HashSet<Address> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match Address::from_str(s) {
            Ok(addr) => Some(addr),
            Err(e) => {
                warn!("Ignoring invalid trust list entry {}: {}", s, e);
                None
            }
        })
        .collect()
}
