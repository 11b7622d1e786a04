//! Deterministic risk rules over fetched signals

pub mod liquidity;
pub mod price;
pub mod ownership;
pub mod rules;

pub use liquidity::*;
pub use price::*;
pub use ownership::*;
pub use rules::*;
