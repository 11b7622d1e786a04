//! External market, security and source signals

pub mod feed;
pub mod market;
pub mod security;
pub mod source;
pub mod acquisition;

pub use feed::*;
pub use market::*;
pub use security::*;
pub use source::*;
pub use acquisition::*;
