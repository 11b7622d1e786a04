//! Audit orchestration

pub mod phase;
pub mod orchestrator;

pub use phase::*;
pub use orchestrator::*;
