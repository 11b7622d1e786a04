//! Core data types and structures

pub mod addresses;
pub mod flags;
pub mod request;
pub mod signals;
pub mod classifier;
pub mod validation;
pub mod verdict;
pub mod health;

pub use addresses::*;
pub use flags::*;
pub use request::*;
pub use signals::*;
pub use classifier::*;
pub use validation::*;
pub use verdict::*;
pub use health::*;
