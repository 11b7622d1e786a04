//! Concurrent signal acquisition across all three feeds

use alloy::primitives::Address;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use crate::{
    config::Config,
    errors::{OracleError, OracleResult},
    network::build_http_client,
    signals::{BaseScanFeed, CoinGeckoFeed, GoPlusFeed, MarketFeed, SecurityFeed, SourceFeed},
    types::{CodeAuditSignal, MarketSignal, SecuritySignal},
};

/// Raw outcome of one acquisition round. Every feed settles independently.
#[derive(Debug)]
pub struct SignalBundle {
    pub market: OracleResult<MarketSignal>,
    pub security: OracleResult<SecuritySignal>,
    pub source: CodeAuditSignal,
}

#[derive(Clone)]
pub struct SignalFeeds {
    pub market: Arc<dyn MarketFeed>,
    pub security: Arc<dyn SecurityFeed>,
    pub source: Arc<dyn SourceFeed>,
}

impl SignalFeeds {
    pub fn new(
        market: Arc<dyn MarketFeed>,
        security: Arc<dyn SecurityFeed>,
        source: Arc<dyn SourceFeed>,
    ) -> Self {
        Self {
            market,
            security,
            source,
        }
    }

    /// Live HTTP feeds sharing one client.
    pub fn from_config(config: &Config) -> OracleResult<Self> {
        let client = build_http_client(config.fetch_timeout_secs).map_err(|e| OracleError::Configuration {
            message: format!("HTTP client: {:#}", e),
        })?;

        Ok(Self::new(
            Arc::new(CoinGeckoFeed::new(
                client.clone(),
                config.coingecko_base_url.clone(),
                config.coingecko_api_key.clone(),
            )),
            Arc::new(GoPlusFeed::new(
                client.clone(),
                config.goplus_base_url.clone(),
                config.goplus_access_token.clone(),
            )),
            Arc::new(BaseScanFeed::new(
                client,
                config.basescan_base_url.clone(),
                config.basescan_api_key.clone(),
            )),
        ))
    }

    /// Fetches all three signals concurrently and waits for every one to settle.
    pub async fn acquire(&self, token: Address, chain_id: u64, price_feed_id: &str) -> SignalBundle {
        let start = Instant::now();
        debug!("Acquiring signals for {} on chain {} (feed {})", token, chain_id, price_feed_id);

        let (market, security, source) = tokio::join!(
            self.market.fetch_market(price_feed_id),
            self.security.fetch_security(token, chain_id),
            self.source.fetch_source(token, chain_id),
        );

        info!(
            "📡 Signals settled in {:?}: market={} security={} source={}",
            start.elapsed(),
            if market.is_ok() { "ok" } else { "failed" },
            if security.is_ok() { "ok" } else { "failed" },
            if source.is_verified() { "verified" } else { "unverified" },
        );

        SignalBundle {
            market,
            security,
            source,
        }
    }
}
