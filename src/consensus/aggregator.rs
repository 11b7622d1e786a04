//! Union-of-fears aggregation
//!
//! Every participant can only add bits. There is no quorum and no way for a
//! clean opinion to clear a flag raised elsewhere.

use tracing::{info, warn};
use crate::types::{AiCoverage, ClassifierResult, LogicAssessment, RiskMask};

pub const LOGIC_ONLY_NOTE: &str = "AI cluster unreachable, logic-only verdict.";

#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusOutcome {
    pub logic_flags: RiskMask,
    pub ai_flags: RiskMask,
    pub final_risk_code: RiskMask,
    pub verdict: bool,
    pub ai_coverage: AiCoverage,
    pub reasoning: String,
}

pub fn union_of_masks(masks: impl IntoIterator<Item = RiskMask>) -> RiskMask {
    masks.into_iter().fold(RiskMask::EMPTY, |acc, mask| acc | mask)
}

pub fn ai_coverage(results: &[ClassifierResult]) -> AiCoverage {
    let succeeded = results.iter().filter(|r| r.is_success()).count();
    match succeeded {
        0 => AiCoverage::LogicOnly,
        n if n == results.len() => AiCoverage::Full,
        _ => AiCoverage::Partial,
    }
}

/// Merges logic flags with every successful classifier mask. `notes` are
/// appended to the reasoning trail as-is.
pub fn aggregate(
    logic: &LogicAssessment,
    results: &[ClassifierResult],
    notes: &[String],
) -> ConsensusOutcome {
    let ai_flags = union_of_masks(results.iter().filter(|r| r.is_success()).map(|r| r.mask));
    let final_risk_code = logic.flags | ai_flags;
    let coverage = ai_coverage(results);

    let mut trail: Vec<String> = notes.to_vec();
    trail.extend(logic.findings.iter().map(|f| format!("[LOGIC] {}", f)));
    for result in results {
        match &result.error {
            None => trail.push(format!("[{}] {}", result.model_name, result.reasoning)),
            Some(error) => trail.push(format!("[{}] FAILED: {}", result.model_name, error)),
        }
    }
    if coverage == AiCoverage::LogicOnly {
        warn!("⚠️ No classifier succeeded, falling back to logic flags only");
        trail.push(LOGIC_ONLY_NOTE.to_string());
    }

    let verdict = final_risk_code.is_empty();
    info!(
        "⚖️ Consensus: logic={} ai={} final={} coverage={:?}",
        logic.flags, ai_flags, final_risk_code, coverage
    );

    ConsensusOutcome {
        logic_flags: logic.flags,
        ai_flags,
        final_risk_code,
        verdict,
        ai_coverage: coverage,
        reasoning: trail.join(" | "),
    }
}
