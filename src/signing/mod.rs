//! Deterministic verdict signing

pub mod message;
pub mod signer;

pub use message::*;
pub use signer::*;
