//! Shared types for the storefront pricing stack
//!
//! Common types used across the workspace: money primitives, the discount
//! rule model, cart snapshots, the pricing receipt, and the rejection
//! taxonomy surfaced to the checkout UI.

pub mod config;
pub mod error;
pub mod models;
pub mod money;
pub mod receipt;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use config::StoreConfig;
pub use error::{PricingError, RejectionReason};
pub use models::cart::{CartLineSnapshot, ItemId};
pub use models::discount_rule::{DiscountRule, DiscountScope, DiscountValue, UsageLimit};
pub use money::{Currency, Money, MoneyError};
pub use receipt::PricingResult;
