//! Command tree module
//!
//! The node contract between the parser and the execution engine.

pub mod types;

pub use types::*;
