//! Audit request schema and validation

use alloy::primitives::{Address, B256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use crate::errors::{OracleError, OracleResult};

/// Accepts `"8453"` as well as `8453` for numeric fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Text(String),
    Number(serde_json::Number),
}

impl NumericInput {
    fn as_text(&self) -> String {
        match self {
            NumericInput::Text(s) => s.trim().to_string(),
            NumericInput::Number(n) => n.to_string(),
        }
    }
}

/// Wire shape of an audit request, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuditRequest {
    pub token_address: Option<String>,
    pub chain_id: Option<NumericInput>,
    pub asking_price: Option<NumericInput>,
    pub user_address: Option<String>,
    #[serde(alias = "coingeckoId")]
    pub price_feed_id: Option<String>,
    #[serde(alias = "vrfSalt")]
    pub salt: Option<String>,
    #[serde(alias = "details")]
    pub trade_details: Option<Value>,
}

/// A validated audit request. Construct through [`AuditRequest::from_slice`]
/// or [`AuditRequest::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    pub token_address: Address,
    pub chain_id: u64,
    pub asking_price: Option<Decimal>,
    pub user_address: Option<Address>,
    pub price_feed_id: Option<String>,
    pub salt: Option<B256>,
    pub trade_details: Option<Value>,
}

impl AuditRequest {
    pub fn new(token_address: Address, chain_id: u64) -> Self {
        Self {
            token_address,
            chain_id,
            asking_price: None,
            user_address: None,
            price_feed_id: None,
            salt: None,
            trade_details: None,
        }
    }

    pub fn from_slice(body: &[u8]) -> OracleResult<Self> {
        let raw: RawAuditRequest = serde_json::from_slice(body)
            .map_err(|e| OracleError::invalid("body", format!("malformed JSON payload: {}", e)))?;
        Self::validate(raw)
    }

    pub fn validate(raw: RawAuditRequest) -> OracleResult<Self> {
        let token_address = match raw.token_address.as_deref().map(str::trim) {
            None | Some("") => return Err(OracleError::invalid("tokenAddress", "is required")),
            Some(s) => parse_address(s, "tokenAddress")?,
        };

        let chain_id = match raw.chain_id.as_ref().map(NumericInput::as_text) {
            None => return Err(OracleError::invalid("chainId", "is required")),
            Some(s) if s.is_empty() => return Err(OracleError::invalid("chainId", "is required")),
            Some(s) => match s.parse::<u64>() {
                Ok(id) if id > 0 => id,
                _ => {
                    return Err(OracleError::invalid(
                        "chainId",
                        format!("must be a positive integer, got {}", s),
                    ))
                }
            },
        };

        let asking_price = match raw.asking_price.as_ref().map(NumericInput::as_text) {
            None => None,
            Some(s) if s.is_empty() => None,
            Some(s) => {
                let price = Decimal::from_str(&s)
                    .or_else(|_| Decimal::from_scientific(&s))
                    .map_err(|_| OracleError::invalid("askingPrice", format!("not a number: {}", s)))?;
                if price.is_sign_negative() {
                    return Err(OracleError::invalid("askingPrice", "must not be negative"));
                }
                Some(price)
            }
        };

        let user_address = match raw.user_address.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(parse_address(s, "userAddress")?),
        };

        let salt = match raw.salt.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                B256::from_str(s)
                    .map_err(|_| OracleError::invalid("salt", "must be a 32-byte hex value"))?,
            ),
        };

        let price_feed_id = raw
            .price_feed_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            token_address,
            chain_id,
            asking_price,
            user_address,
            price_feed_id,
            salt,
            trade_details: raw.trade_details.filter(|v| !v.is_null()),
        })
    }
}

fn parse_address(value: &str, field: &'static str) -> OracleResult<Address> {
    Address::from_str(value)
        .map_err(|e| OracleError::invalid(field, format!("not a valid address: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use crate::types::USDC_MAINNET;

    #[test]
    fn accepts_the_original_wire_names() {
        let body = br#"{
            "tokenAddress": "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913",
            "chainId": "8453",
            "askingPrice": "1.00",
            "coingeckoId": "usd-coin",
            "vrfSalt": "0x0000000000000000000000000000000000000000000000000000000000000001",
            "details": { "totalEscrowValue": 4650, "targetAmount": 4650 }
        }"#;

        let request = AuditRequest::from_slice(body).unwrap();
        assert_eq!(request.token_address, USDC_MAINNET);
        assert_eq!(request.chain_id, 8453);
        assert_eq!(request.asking_price, Some(dec!(1.00)));
        assert_eq!(request.price_feed_id.as_deref(), Some("usd-coin"));
        assert_eq!(request.salt.unwrap().0[31], 1);
        assert!(request.trade_details.is_some());
    }

    #[test]
    fn numeric_chain_id_is_accepted() {
        let body = br#"{"tokenAddress":"0x4200000000000000000000000000000000000006","chainId":8453}"#;
        assert_eq!(AuditRequest::from_slice(body).unwrap().chain_id, 8453);
    }

    #[test]
    fn rejects_missing_or_invalid_fields() {
        let cases: &[(&[u8], &str)] = &[
            (b"not json", "body"),
            (br#"{"chainId":"8453"}"#, "tokenAddress"),
            (br#"{"tokenAddress":"0x1234","chainId":"8453"}"#, "tokenAddress"),
            (br#"{"tokenAddress":"0x4200000000000000000000000000000000000006"}"#, "chainId"),
            (br#"{"tokenAddress":"0x4200000000000000000000000000000000000006","chainId":"0"}"#, "chainId"),
            (br#"{"tokenAddress":"0x4200000000000000000000000000000000000006","chainId":"base"}"#, "chainId"),
            (br#"{"tokenAddress":"0x4200000000000000000000000000000000000006","chainId":"8453","askingPrice":"-1"}"#, "askingPrice"),
            (br#"{"tokenAddress":"0x4200000000000000000000000000000000000006","chainId":"8453","salt":"0x0"}"#, "salt"),
        ];

        for (body, expected_field) in cases {
            match AuditRequest::from_slice(body) {
                Err(OracleError::InvalidRequest { field, .. }) => assert_eq!(field, *expected_field),
                other => panic!("expected invalid {} got {:?}", expected_field, other),
            }
        }
    }

    #[test]
    fn blank_optional_fields_are_treated_as_absent() {
        let body = br#"{
            "tokenAddress": "0x4200000000000000000000000000000000000006",
            "chainId": "8453",
            "askingPrice": "",
            "userAddress": " ",
            "priceFeedId": "",
            "salt": ""
        }"#;
        let request = AuditRequest::from_slice(body).unwrap();
        assert_eq!(request.asking_price, None);
        assert_eq!(request.user_address, None);
        assert_eq!(request.price_feed_id, None);
        assert_eq!(request.salt, None);
    }
}
