//! Per-request audit lifecycle

use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditPhase {
    Received,
    SignalAcquisition,
    LogicEval,
    AiFanout,
    Aggregation,
    Signing,
    Responded,
    Error,
}

impl AuditPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuditPhase::Received => "RECEIVED",
            AuditPhase::SignalAcquisition => "SIGNAL_ACQUISITION",
            AuditPhase::LogicEval => "LOGIC_EVAL",
            AuditPhase::AiFanout => "AI_FANOUT",
            AuditPhase::Aggregation => "AGGREGATION",
            AuditPhase::Signing => "SIGNING",
            AuditPhase::Responded => "RESPONDED",
            AuditPhase::Error => "ERROR",
        }
    }
}

impl fmt::Display for AuditPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered record of the phases one audit went through.
#[derive(Debug, Clone)]
pub struct AuditTrace {
    audit_id: String,
    phases: Vec<AuditPhase>,
}

impl AuditTrace {
    pub fn new(audit_id: impl Into<String>) -> Self {
        let mut trace = Self {
            audit_id: audit_id.into(),
            phases: Vec::with_capacity(7),
        };
        trace.enter(AuditPhase::Received);
        trace
    }

    pub fn audit_id(&self) -> &str {
        &self.audit_id
    }

    pub fn enter(&mut self, phase: AuditPhase) {
        info!(audit_id = %self.audit_id, phase = %phase, "➡️ {}", phase);
        self.phases.push(phase);
    }

    pub fn current(&self) -> Option<AuditPhase> {
        self.phases.last().copied()
    }

    pub fn phases(&self) -> &[AuditPhase] {
        &self.phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_starts_received_and_keeps_order() {
        let mut trace = AuditTrace::new("audit-1");
        trace.enter(AuditPhase::SignalAcquisition);
        trace.enter(AuditPhase::Error);
        assert_eq!(
            trace.phases(),
            &[AuditPhase::Received, AuditPhase::SignalAcquisition, AuditPhase::Error]
        );
        assert_eq!(trace.current(), Some(AuditPhase::Error));
    }
}
