//! Normalized external signals

use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::Serialize;

pub const UNVERIFIED_SOURCE: &str = "UNVERIFIED";

/// Price, volume and capitalization snapshot from the market feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSignal {
    pub price_usd: Decimal,
    pub volume_24h: Decimal,
    pub market_cap: Decimal,
    pub price_change_24h: Decimal,
}

impl MarketSignal {
    /// volume24h / marketCap, zero when the market cap is unknown.
    pub fn volume_to_market_cap(&self) -> Decimal {
        if self.market_cap.is_zero() {
            return Decimal::ZERO;
        }
        self.volume_24h / self.market_cap
    }

    pub fn with_price(price_usd: Decimal) -> Self {
        Self {
            price_usd,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySignal {
    pub is_honeypot: bool,
    pub owner_address: Option<Address>,
    pub creator_address: Option<Address>,
    pub is_open_source: bool,
    pub buy_tax: Option<Decimal>,
    pub sell_tax: Option<Decimal>,
    pub hidden_owner: bool,
    pub cannot_sell_all: bool,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
}

/// Contract source after proxy resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CodeAuditSignal {
    #[serde(rename_all = "camelCase")]
    Verified {
        contract_name: String,
        source_text: String,
        /// Set when the audited token is a proxy and this is its implementation.
        implementation: Option<Address>,
    },
    Unverified {
        reason: String,
    },
}

impl CodeAuditSignal {
    pub fn unverified(reason: impl Into<String>) -> Self {
        CodeAuditSignal::Unverified {
            reason: reason.into(),
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, CodeAuditSignal::Verified { .. })
    }

    /// Source text, or the `UNVERIFIED` sentinel.
    pub fn source_text(&self) -> &str {
        match self {
            CodeAuditSignal::Verified { source_text, .. } => source_text,
            CodeAuditSignal::Unverified { .. } => UNVERIFIED_SOURCE,
        }
    }
}
