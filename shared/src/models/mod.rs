//! Data models
//!
//! Shared between the pricing engine and the surrounding application
//! (checkout UI, order persistence, rule authoring).

pub mod cart;
pub mod discount_rule;

// Re-exports
pub use cart::*;
pub use discount_rule::*;
