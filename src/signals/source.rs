//! BaseScan verified source feed with one level of proxy resolution

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, info, warn};
use crate::{
    errors::{OracleError, OracleResult},
    network::send_json,
    signals::SourceFeed,
    types::CodeAuditSignal,
};

const FEED: &str = "basescan";

/// One `getsourcecode` record.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub source_code: String,
    pub contract_name: String,
    pub implementation: Option<Address>,
}

impl SourceRecord {
    pub fn is_verified(&self) -> bool {
        !self.source_code.trim().is_empty()
    }
}

pub struct BaseScanFeed {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BaseScanFeed {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn fetch_record(&self, address: Address, chain_id: u64) -> OracleResult<SourceRecord> {
        let address_param = address.to_string();
        let chain_param = chain_id.to_string();
        let mut params = vec![
            ("module", "contract"),
            ("action", "getsourcecode"),
            ("address", address_param.as_str()),
            ("chainid", chain_param.as_str()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("apikey", key.as_str()));
        }

        let request = self.client.get(&self.base_url).query(&params);
        let json = send_json(request, "BaseScan")
            .await
            .map_err(|e| OracleError::signal(FEED, format!("source fetch failed for {}", address), e))?;

        parse_source_record(&json)
    }
}

#[async_trait]
impl SourceFeed for BaseScanFeed {
    async fn fetch_source(&self, token: Address, chain_id: u64) -> CodeAuditSignal {
        let record = match self.fetch_record(token, chain_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!("⚠️ BaseScan lookup for {} failed: {:#}", token, e);
                return CodeAuditSignal::unverified(e.to_string());
            }
        };

        // Only one hop: the implementation's own proxy fields are ignored
        if let Some(implementation) = record.implementation {
            info!("🔗 {} is a proxy, fetching implementation {}", token, implementation);
            return match self.fetch_record(implementation, chain_id).await {
                Ok(imp) if imp.is_verified() => CodeAuditSignal::Verified {
                    contract_name: imp.contract_name,
                    source_text: imp.source_code,
                    implementation: Some(implementation),
                },
                Ok(_) => CodeAuditSignal::unverified(format!(
                    "implementation {} not verified",
                    implementation
                )),
                Err(e) => {
                    warn!("⚠️ BaseScan implementation lookup failed: {:#}", e);
                    CodeAuditSignal::unverified(e.to_string())
                }
            };
        }

        if !record.is_verified() {
            debug!("{} has no verified source", token);
            return CodeAuditSignal::unverified("contract source not verified");
        }

        CodeAuditSignal::Verified {
            contract_name: record.contract_name,
            source_text: record.source_code,
            implementation: None,
        }
    }
}

/// Decodes the first `result` entry. `status: "0"` carries the reason in `result`.
pub fn parse_source_record(json: &Value) -> OracleResult<SourceRecord> {
    let rejected = |message: String| OracleError::SignalUnavailable {
        feed: FEED,
        message,
        source: None,
    };

    if json["status"].as_str() == Some("0") {
        let reason = match &json["result"] {
            Value::String(s) => s.clone(),
            _ => json["message"].as_str().unwrap_or("NOTOK").to_string(),
        };
        return Err(rejected(format!("explorer rejected lookup: {}", reason)));
    }

    let Some(entry) = json["result"].as_array().and_then(|r| r.first()) else {
        return Err(rejected("explorer returned no source record".to_string()));
    };

    let text = |key: &str| entry[key].as_str().unwrap_or_default().to_string();
    let is_proxy = entry["Proxy"].as_str() == Some("1");
    let implementation = if is_proxy {
        entry["Implementation"]
            .as_str()
            .and_then(|s| Address::from_str(s.trim()).ok())
            .filter(|a| !a.is_zero())
    } else {
        None
    };

    Ok(SourceRecord {
        source_code: text("SourceCode"),
        contract_name: text("ContractName"),
        implementation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use serde_json::json;

    #[test]
    fn proxy_record_exposes_implementation() {
        let json = json!({
            "status": "1",
            "message": "OK",
            "result": [{
                "SourceCode": "contract FiatTokenProxy {}",
                "ContractName": "FiatTokenProxy",
                "Proxy": "1",
                "Implementation": "0x2Ce6311ddAE708829bc0784C967b7d77D19FD779"
            }]
        });
        let record = parse_source_record(&json).unwrap();
        assert_eq!(
            record.implementation,
            Some(address!("2Ce6311ddAE708829bc0784C967b7d77D19FD779"))
        );
        assert!(record.is_verified());
    }

    #[test]
    fn zero_implementation_is_not_a_proxy() {
        let json = json!({
            "status": "1",
            "result": [{
                "SourceCode": "",
                "ContractName": "",
                "Proxy": "1",
                "Implementation": "0x0000000000000000000000000000000000000000"
            }]
        });
        let record = parse_source_record(&json).unwrap();
        assert_eq!(record.implementation, None);
        assert!(!record.is_verified());
    }

    #[test]
    fn notok_status_is_an_error() {
        let json = json!({ "status": "0", "message": "NOTOK", "result": "Invalid API Key" });
        match parse_source_record(&json) {
            Err(OracleError::SignalUnavailable { feed: "basescan", message, .. }) => {
                assert!(message.contains("Invalid API Key"))
            }
            other => panic!("expected basescan rejection, got {:?}", other),
        }
    }
}
