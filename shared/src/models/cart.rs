//! Cart snapshot types
//!
//! A cart never carries client-cached prices. The client persists item ids
//! only; every pricing pass re-resolves prices against a fresh catalog
//! snapshot, so a stale client can never checkout at an outdated price.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Catalog item identifier (CMS document id)
pub type ItemId = String;

/// One priced line in a cart, freshly resolved from the catalog
///
/// `current_price` already reflects any catalog-level promotion;
/// `promotion_active` records that fact so the stacking policy can refuse
/// to combine a non-stackable discount code with an ongoing sale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLineSnapshot {
    /// Catalog item id
    pub item_id: ItemId,
    /// Always 1 for this domain: software licenses do not stack per item
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Undiscounted list price
    pub base_price: Money,
    /// Price currently charged (promotional price when a promotion runs)
    pub current_price: Money,
    /// Whether a catalog promotion is baked into `current_price`
    #[serde(default)]
    pub promotion_active: bool,
}

fn default_quantity() -> u32 {
    1
}

impl CartLineSnapshot {
    /// Create a line at list price (no promotion running)
    pub fn at_list_price(item_id: impl Into<ItemId>, price: Money) -> Self {
        Self {
            item_id: item_id.into(),
            quantity: 1,
            base_price: price,
            current_price: price,
            promotion_active: false,
        }
    }

    /// Create a line with an active promotional price
    ///
    /// Upholds the `current_price <= base_price` invariant by clamping the
    /// promotional price to the list price.
    pub fn on_promotion(item_id: impl Into<ItemId>, base_price: Money, promo_price: Money) -> Self {
        Self {
            item_id: item_id.into(),
            quantity: 1,
            base_price,
            current_price: promo_price.min(base_price),
            promotion_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_promotion_price_clamped_to_list_price() {
        let base = Money::from_minor(5000, Currency::Ghs);
        let promo = Money::from_minor(6000, Currency::Ghs);

        let line = CartLineSnapshot::on_promotion("app-1", base, promo);
        assert_eq!(line.current_price, base);
        assert!(line.promotion_active);
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let json = r#"{
            "item_id": "app-1",
            "base_price": { "minor": 1000, "currency": "GHS" },
            "current_price": { "minor": 1000, "currency": "GHS" }
        }"#;

        let line: CartLineSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(line.quantity, 1);
        assert!(!line.promotion_active);
    }
}
