//! GoPlus token security feed

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, warn};
use crate::{
    errors::{OracleError, OracleResult},
    network::send_json,
    signals::SecurityFeed,
    types::SecuritySignal,
};

const FEED: &str = "goplus";

pub struct GoPlusFeed {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl GoPlusFeed {
    pub fn new(client: Client, base_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            access_token,
        }
    }
}

#[async_trait]
impl SecurityFeed for GoPlusFeed {
    async fn fetch_security(&self, token: Address, chain_id: u64) -> OracleResult<SecuritySignal> {
        let url = format!(
            "{}/token_security/{}",
            self.base_url.trim_end_matches('/'),
            chain_id
        );
        let token_key = token.to_string().to_lowercase();
        let mut request = self
            .client
            .get(&url)
            .query(&[("contract_addresses", token_key.as_str())]);
        if let Some(access_token) = &self.access_token {
            request = request.header("Authorization", access_token);
        }

        let json = send_json(request, "GoPlus")
            .await
            .map_err(|e| OracleError::signal(FEED, format!("security fetch failed for {}", token), e))?;

        parse_token_security(&json, &token)
    }
}

/// GoPlus answers `code: 1` on success. An unknown token is empty data.
pub fn parse_token_security(json: &Value, token: &Address) -> OracleResult<SecuritySignal> {
    let code = json["code"].as_i64().unwrap_or_default();
    if code != 1 {
        let message = json["message"].as_str().unwrap_or("unknown error").to_string();
        return Err(OracleError::signal(
            FEED,
            format!("API returned code {}", code),
            anyhow::anyhow!(message),
        ));
    }

    let token_key = token.to_string();
    let entry = json["result"]
        .as_object()
        .and_then(|result| {
            result
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(&token_key))
                .map(|(_, v)| v)
        });

    let Some(entry) = entry else {
        warn!("⚠️ GoPlus has no security record for {}", token);
        return Ok(SecuritySignal::default());
    };

    let signal = SecuritySignal {
        is_honeypot: flag(entry, "is_honeypot"),
        owner_address: address_field(entry, "owner_address"),
        creator_address: address_field(entry, "creator_address"),
        is_open_source: flag(entry, "is_open_source"),
        buy_tax: decimal_field(entry, "buy_tax"),
        sell_tax: decimal_field(entry, "sell_tax"),
        hidden_owner: flag(entry, "hidden_owner"),
        cannot_sell_all: flag(entry, "cannot_sell_all"),
        token_name: string_field(entry, "token_name"),
        token_symbol: string_field(entry, "token_symbol"),
    };
    debug!("GoPlus {}: {:?}", token, signal);
    Ok(signal)
}

fn string_field(entry: &Value, key: &str) -> Option<String> {
    entry[key]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// "1" means yes; GoPlus encodes booleans as strings
fn flag(entry: &Value, key: &str) -> bool {
    match &entry[key] {
        Value::String(s) => s.trim() == "1",
        Value::Number(n) => n.as_i64() == Some(1),
        Value::Bool(b) => *b,
        _ => false,
    }
}

fn address_field(entry: &Value, key: &str) -> Option<Address> {
    string_field(entry, key).and_then(|s| Address::from_str(&s).ok())
}

fn decimal_field(entry: &Value, key: &str) -> Option<Decimal> {
    string_field(entry, key).and_then(|s| Decimal::from_str(&s).ok())
}
