//! Consensus aggregation of logic and AI risk flags

pub mod aggregator;

pub use aggregator::*;
