//! Liquidity rule

use rust_decimal::prelude::*;
use crate::types::MarketSignal;

/// Finding when an untrusted token trades below the volume/market-cap ratio.
pub fn check_liquidity(market: &MarketSignal, threshold: Decimal, trusted: bool) -> Option<String> {
    if trusted {
        return None;
    }

    let ratio = market.volume_to_market_cap();
    if ratio < threshold {
        return Some(format!(
            "Low liquidity: volume/market cap {} below {}",
            ratio.round_dp(4),
            threshold
        ));
    }

    None
}
