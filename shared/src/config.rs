//! Store configuration
//!
//! Explicit configuration handed to the engine at construction. There is no
//! process-wide mutable settings object; callers that need different
//! settings construct a different engine.

use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Storefront settings relevant to pricing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Settlement currency; every cart line must be priced in it
    #[serde(default)]
    pub currency: Currency,
}

impl StoreConfig {
    pub const fn new(currency: Currency) -> Self {
        Self { currency }
    }

    /// Zero amount in the store currency (subtotal of an empty cart)
    pub const fn zero(&self) -> Money {
        Money::zero(self.currency)
    }
}
