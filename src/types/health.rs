//! Health monitoring types

use alloy::primitives::Address;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub classifiers: Vec<String>,
    pub trust_list_size: usize,
    pub signer_address: Address,
    pub uptime_seconds: u64,
}
