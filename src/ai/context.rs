//! Forensic context handed to every classifier backend

use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use crate::{
    errors::{OracleError, OracleResult},
    network::truncate,
    types::{AuditRequest, CodeAuditSignal, MarketSignal, SecuritySignal},
    validation::price_deviation_pct,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenContext {
    pub address: Address,
    pub chain_id: u64,
    pub trusted: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    #[serde(flatten)]
    pub signal: MarketSignal,
    pub volume_to_market_cap: Decimal,
    /// Set when the price came from the configured fallback, not the feed
    pub fallback_price: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeContext {
    pub asking_price: Option<Decimal>,
    pub market_price: Decimal,
    /// Two decimals with a trailing `%`, absent without a price pair
    pub deviation_percent: Option<String>,
    pub user_address: Option<Address>,
    pub details: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContext {
    pub verified: bool,
    pub contract_name: Option<String>,
    pub is_proxy: bool,
    pub implementation: Option<Address>,
    pub snippet: String,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unverified_reason: Option<String>,
}

impl SourceContext {
    pub fn from_signal(signal: &CodeAuditSignal, max_chars: usize) -> Self {
        match signal {
            CodeAuditSignal::Verified {
                contract_name,
                source_text,
                implementation,
            } => {
                let snippet = truncate(source_text, max_chars);
                Self {
                    verified: true,
                    contract_name: Some(contract_name.clone()).filter(|n| !n.is_empty()),
                    is_proxy: implementation.is_some(),
                    implementation: *implementation,
                    truncated: snippet.len() < source_text.len(),
                    snippet: snippet.to_string(),
                    unverified_reason: None,
                }
            }
            CodeAuditSignal::Unverified { reason } => Self {
                verified: false,
                contract_name: None,
                is_proxy: false,
                implementation: None,
                snippet: signal.source_text().to_string(),
                truncated: false,
                unverified_reason: Some(reason.clone()),
            },
        }
    }
}

/// Everything a classifier sees about one audit, serialized once per request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForensicContext {
    pub token: TokenContext,
    pub market: MarketContext,
    pub security: SecuritySignal,
    pub trade: TradeContext,
    pub source: SourceContext,
}

impl ForensicContext {
    pub fn builder(request: &AuditRequest) -> ForensicContextBuilder<'_> {
        ForensicContextBuilder {
            request,
            trusted: false,
            market: MarketSignal::default(),
            fallback_price: false,
            security: SecuritySignal::default(),
            source: CodeAuditSignal::unverified("not fetched"),
            snippet_chars: usize::MAX,
        }
    }

    pub fn to_json(&self) -> OracleResult<String> {
        serde_json::to_string(self).map_err(|e| OracleError::DataParsing {
            context: "forensic context serialization".to_string(),
            source: e.into(),
        })
    }
}

pub struct ForensicContextBuilder<'a> {
    request: &'a AuditRequest,
    trusted: bool,
    market: MarketSignal,
    fallback_price: bool,
    security: SecuritySignal,
    source: CodeAuditSignal,
    snippet_chars: usize,
}

impl ForensicContextBuilder<'_> {
    pub fn trusted(mut self, trusted: bool) -> Self {
        self.trusted = trusted;
        self
    }

    pub fn market(mut self, market: MarketSignal, fallback_price: bool) -> Self {
        self.market = market;
        self.fallback_price = fallback_price;
        self
    }

    pub fn security(mut self, security: SecuritySignal) -> Self {
        self.security = security;
        self
    }

    pub fn source(mut self, source: CodeAuditSignal) -> Self {
        self.source = source;
        self
    }

    pub fn snippet_chars(mut self, snippet_chars: usize) -> Self {
        self.snippet_chars = snippet_chars;
        self
    }

    pub fn build(self) -> ForensicContext {
        let request = self.request;
        let market_price = self.market.price_usd;
        let deviation_percent = request
            .asking_price
            .and_then(|asking| price_deviation_pct(asking, market_price))
            .map(|d| format!("{:.2}%", d.round_dp(2)));

        ForensicContext {
            token: TokenContext {
                address: request.token_address,
                chain_id: request.chain_id,
                trusted: self.trusted,
            },
            market: MarketContext {
                volume_to_market_cap: self.market.volume_to_market_cap(),
                signal: self.market,
                fallback_price: self.fallback_price,
            },
            security: self.security,
            trade: TradeContext {
                asking_price: request.asking_price,
                market_price,
                deviation_percent,
                user_address: request.user_address,
                details: request.trade_details.clone(),
            },
            source: SourceContext::from_signal(&self.source, self.snippet_chars),
        }
    }
}
