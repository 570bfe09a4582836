//! Stacking policy
//!
//! Decides whether a discount code may combine with item-level promotions
//! already reflected in catalog prices. The check is cart-wide, not
//! per-line: a single promotional line blocks a non-stackable code for the
//! entire cart, matching the all-or-nothing checkout total.

use shared::{CartLineSnapshot, DiscountRule};

/// Whether `rule` may be applied on top of the cart's active promotions
pub fn can_stack(rule: &DiscountRule, cart: &[CartLineSnapshot]) -> bool {
    if rule.stackable_with_promotions {
        return true;
    }
    !cart.iter().any(|line| line.promotion_active)
}
