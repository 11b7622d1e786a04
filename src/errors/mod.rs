//! Error taxonomy for the audit pipeline

pub mod oracle_error;

pub use oracle_error::*;
