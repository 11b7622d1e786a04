//! Capability traits for the three external signal sources

use alloy::primitives::Address;
use async_trait::async_trait;
use crate::{
    errors::OracleResult,
    types::{CodeAuditSignal, MarketSignal, SecuritySignal},
};

/// Price, volume and market cap keyed by price feed id.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    async fn fetch_market(&self, price_feed_id: &str) -> OracleResult<MarketSignal>;
}

/// Structural token security analysis.
#[async_trait]
pub trait SecurityFeed: Send + Sync {
    async fn fetch_security(&self, token: Address, chain_id: u64) -> OracleResult<SecuritySignal>;
}

/// Verified contract source. Never fails: failures become
/// [`CodeAuditSignal::Unverified`].
#[async_trait]
pub trait SourceFeed: Send + Sync {
    async fn fetch_source(&self, token: Address, chain_id: u64) -> CodeAuditSignal;
}
