//! AI classifier result types

use serde::Serialize;
use super::RiskMask;
use crate::errors::OracleError;

/// A validated classifier answer: every flag is a known RiskFlag combination.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierOpinion {
    pub flags: Vec<u32>,
    pub mask: RiskMask,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassifierStatus {
    Success,
    Failed,
}

/// Outcome of one backend call. One per configured backend, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierResult {
    pub model_name: String,
    pub status: ClassifierStatus,
    pub flags: Vec<u32>,
    pub mask: RiskMask,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassifierResult {
    pub fn success(model_name: impl Into<String>, opinion: ClassifierOpinion) -> Self {
        Self {
            model_name: model_name.into(),
            status: ClassifierStatus::Success,
            flags: opinion.flags,
            mask: opinion.mask,
            reasoning: opinion.reasoning,
            error: None,
        }
    }

    pub fn failed(model_name: impl Into<String>, error: &OracleError) -> Self {
        Self {
            model_name: model_name.into(),
            status: ClassifierStatus::Failed,
            flags: Vec::new(),
            mask: RiskMask::EMPTY,
            reasoning: String::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ClassifierStatus::Success
    }
}
