//! Discount & Pricing Engine
//!
//! Takes a cart of priced items, an optional discount code and the store's
//! active promotions, and deterministically computes a final chargeable
//! total while enforcing stacking, eligibility and limit rules.
//!
//! The pricing math ([`calculator`], [`eligibility`], [`stacking`]) is pure
//! and synchronous; [`engine::PricingEngine`] wraps it with the async
//! collaborator contracts ([`catalog::CatalogProvider`],
//! [`registry::DiscountRegistry`]) that supply fresh snapshots and rule
//! definitions on every invocation.

pub mod calculator;
pub mod catalog;
pub mod eligibility;
pub mod engine;
pub mod registry;
pub mod stacking;

// Re-exports
pub use calculator::{CodeLookup, compute_discount, price, subtotal};
pub use catalog::{CatalogProvider, InMemoryCatalog};
pub use eligibility::{EligibilityContext, evaluate};
pub use engine::{BuyerContext, CartPricing, PricingEngine};
pub use registry::{DiscountRegistry, InMemoryRegistry, UsageCounters, UsageError};
pub use stacking::can_stack;
