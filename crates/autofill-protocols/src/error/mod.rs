//! Error types for the autofill protocol layer.

mod bridge;
mod vault;

pub use bridge::*;
pub use vault::*;
