//! Verdict and response envelope types

use alloy::primitives::{Address, B256};
use serde::Serialize;
use super::{ClassifierResult, RiskMask};
use crate::errors::OracleError;

/// How much of the AI cluster contributed to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiCoverage {
    Full,
    Partial,
    LogicOnly,
}

/// Signed outcome of one audit. Built once, returned as-is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskVerdict {
    pub audit_id: String,
    pub token_address: Address,
    pub chain_id: u64,
    pub logic_flags: RiskMask,
    pub ai_flags: RiskMask,
    pub final_risk_code: RiskMask,
    pub verdict: bool,
    pub ai_coverage: AiCoverage,
    pub flag_breakdown: Vec<String>,
    pub reasoning: String,
    pub classifier_results: Vec<ClassifierResult>,
    pub salt: B256,
    pub timestamp: u64,
    pub message_hash: B256,
    pub signature: String,
    pub signer_address: Address,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always false: an error never approves a swap.
    pub verdict: bool,
    pub error: String,
    pub error_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<B256>,
}

impl ErrorResponse {
    pub fn from_error(error: &OracleError, audit_id: Option<String>, salt: Option<B256>) -> Self {
        Self {
            verdict: false,
            error: error.to_string(),
            error_code: error.error_code(),
            audit_id,
            salt,
        }
    }
}

/// What `analyze` hands back to its caller.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AuditResponse {
    Verdict(Box<RiskVerdict>),
    Error(ErrorResponse),
}

impl AuditResponse {
    pub fn approved(&self) -> bool {
        matches!(self, AuditResponse::Verdict(v) if v.verdict)
    }

    pub fn verdict(&self) -> Option<&RiskVerdict> {
        match self {
            AuditResponse::Verdict(v) => Some(v),
            AuditResponse::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorResponse> {
        match self {
            AuditResponse::Verdict(_) => None,
            AuditResponse::Error(e) => Some(e),
        }
    }
}
