//! AI classifier fan-out

pub mod context;
pub mod prompt;
pub mod parse;
pub mod classifier;
pub mod fanout;

pub use context::*;
pub use prompt::*;
pub use parse::*;
pub use classifier::*;
pub use fanout::*;
