//! Logging setup and verdict display

pub mod logging;
pub mod display;

pub use logging::*;
pub use display::*;
