//! Aegis Risk Oracle - risk consensus engine for DeFi token swaps on Base
//!
//! Gathers market, security and contract source signals, runs deterministic
//! rules and a cluster of AI classifiers, merges every opinion into one risk
//! bitmask and signs the resulting verdict.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod signals;
pub mod validation;
pub mod ai;
pub mod consensus;
pub mod signing;
pub mod oracle;
pub mod api;
pub mod utils;

// Re-export commonly used items
pub use config::{Config, CONFIG};
pub use errors::{OracleError, OracleResult};
pub use oracle::AuditOrchestrator;
pub use types::{
    AuditRequest, AuditResponse, ClassifierResult, CodeAuditSignal, ErrorResponse, MarketSignal,
    RiskFlag, RiskMask, RiskVerdict, SecuritySignal,
};
