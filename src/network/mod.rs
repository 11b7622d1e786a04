//! HTTP transport shared by signal feeds and classifier backends

pub mod client;

pub use client::*;
