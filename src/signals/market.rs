//! CoinGecko market feed

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::*;
use serde_json::Value;
use tracing::{debug, warn};
use crate::{
    errors::{OracleError, OracleResult},
    network::send_json,
    signals::MarketFeed,
    types::MarketSignal,
};

const FEED: &str = "coingecko";

pub struct CoinGeckoFeed {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoFeed {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl MarketFeed for CoinGeckoFeed {
    async fn fetch_market(&self, price_feed_id: &str) -> OracleResult<MarketSignal> {
        let url = format!("{}/simple/price", self.base_url.trim_end_matches('/'));
        let mut request = self.client.get(&url).query(&[
            ("ids", price_feed_id),
            ("vs_currencies", "usd"),
            ("include_market_cap", "true"),
            ("include_24hr_vol", "true"),
            ("include_24hr_change", "true"),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let json = send_json(request, "CoinGecko")
            .await
            .map_err(|e| OracleError::signal(FEED, format!("price fetch failed for {}", price_feed_id), e))?;

        parse_simple_price(&json, price_feed_id)
    }
}

/// Missing ids are empty data, not a failure: they yield a zeroed signal.
pub fn parse_simple_price(json: &Value, price_feed_id: &str) -> OracleResult<MarketSignal> {
    if !json.is_object() {
        return Err(OracleError::signal(
            FEED,
            "unexpected response shape",
            anyhow::anyhow!("expected a JSON object, got {}", json),
        ));
    }

    let Some(entry) = json.get(price_feed_id) else {
        warn!("⚠️ CoinGecko returned no data for {}", price_feed_id);
        return Ok(MarketSignal::default());
    };

    let signal = MarketSignal {
        price_usd: decimal_field(entry, "usd"),
        volume_24h: decimal_field(entry, "usd_24h_vol"),
        market_cap: decimal_field(entry, "usd_market_cap"),
        price_change_24h: decimal_field(entry, "usd_24h_change"),
    };
    debug!("CoinGecko {}: {:?}", price_feed_id, signal);
    Ok(signal)
}

fn decimal_field(entry: &Value, key: &str) -> Decimal {
    match &entry[key] {
        Value::Number(n) => n
            .as_f64()
            .and_then(Decimal::from_f64)
            .unwrap_or_default(),
        Value::String(s) => Decimal::from_str(s).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn parses_full_entry() {
        let json = json!({
            "usd-coin": {
                "usd": 1.0,
                "usd_market_cap": 60000000000.0,
                "usd_24h_vol": 5400000000.0,
                "usd_24h_change": -0.01
            }
        });
        let signal = parse_simple_price(&json, "usd-coin").unwrap();
        assert_eq!(signal.price_usd, dec!(1));
        assert_eq!(signal.market_cap, dec!(60000000000));
        assert_eq!(signal.volume_to_market_cap(), dec!(0.09));
    }

    #[test]
    fn unknown_id_is_empty_data() {
        let signal = parse_simple_price(&json!({}), "scam-token").unwrap();
        assert_eq!(signal, MarketSignal::default());
    }

    #[test]
    fn non_object_is_a_failure() {
        assert!(matches!(
            parse_simple_price(&json!([1, 2]), "ethereum"),
            Err(OracleError::SignalUnavailable { feed: "coingecko", .. })
        ));
    }
}
