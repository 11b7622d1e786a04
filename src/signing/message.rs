//! Packed verdict message layout
//!
//! `address user ‖ address token ‖ uint256 chainId ‖ uint256 askingPrice×1e8
//! ‖ uint256 timestamp ‖ bool verdict ‖ uint256 riskCode ‖ bytes32 salt`,
//! matching Solidity `abi.encodePacked` for the same field types.

use alloy::primitives::{Address, B256, U256, keccak256};
use rust_decimal::prelude::*;
use crate::{
    errors::{OracleError, OracleResult},
    types::RiskMask,
};

pub const PACKED_LEN: usize = 20 + 20 + 32 + 32 + 32 + 1 + 32 + 32;

const PRICE_DECIMALS: u32 = 8;

/// Asking price as an integer with eight implied decimals, rounded half away
/// from zero. Built from the decimal mantissa, so every non-negative
/// `Decimal` fits.
pub fn price_to_fixed_point(price: Option<Decimal>) -> OracleResult<U256> {
    let Some(price) = price else {
        return Ok(U256::ZERO);
    };
    if price.is_sign_negative() {
        return Err(OracleError::DataParsing {
            context: "asking price fixed-point conversion".to_string(),
            source: anyhow::anyhow!("{} is negative", price),
        });
    }

    let rounded = price.round_dp_with_strategy(PRICE_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    let mantissa = U256::from(rounded.mantissa().unsigned_abs());
    let shift = U256::from(10u64).pow(U256::from(PRICE_DECIMALS - rounded.scale().min(PRICE_DECIMALS)));
    Ok(mantissa * shift)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictMessage {
    pub user: Address,
    pub token: Address,
    pub chain_id: u64,
    pub asking_price: U256,
    pub timestamp: u64,
    pub verdict: bool,
    pub risk_code: RiskMask,
    pub salt: B256,
}

impl VerdictMessage {
    pub fn encode_packed(&self) -> Vec<u8> {
        let mut encoded = Vec::with_capacity(PACKED_LEN);
        encoded.extend_from_slice(self.user.as_slice());
        encoded.extend_from_slice(self.token.as_slice());
        encoded.extend_from_slice(&U256::from(self.chain_id).to_be_bytes::<32>());
        encoded.extend_from_slice(&self.asking_price.to_be_bytes::<32>());
        encoded.extend_from_slice(&U256::from(self.timestamp).to_be_bytes::<32>());
        encoded.push(u8::from(self.verdict));
        encoded.extend_from_slice(&U256::from(self.risk_code.bits()).to_be_bytes::<32>());
        encoded.extend_from_slice(self.salt.as_slice());
        encoded
    }

    pub fn digest(&self) -> B256 {
        keccak256(self.encode_packed())
    }
}
