//! Deterministic rule engine result types

use serde::Serialize;
use super::RiskMask;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicAssessment {
    pub flags: RiskMask,
    /// One human-readable line per triggered rule
    pub findings: Vec<String>,
}
