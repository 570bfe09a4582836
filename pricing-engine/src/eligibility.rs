//! Eligibility evaluation
//!
//! Checks run in a fixed order and short-circuit on the first failure, so
//! callers and tests can assert the exact rejection reason:
//! validity window, usage limits, type-specific condition, stacking.

use crate::calculator::subtotal;
use crate::stacking::can_stack;
use shared::{CartLineSnapshot, DiscountRule, DiscountScope, RejectionReason};

/// Caller-supplied facts about the buyer and the moment of evaluation
///
/// Usage counters come from an external ledger; the engine only validates a
/// cap when the corresponding count is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityContext {
    /// Evaluation time (Unix millis)
    pub now: i64,
    /// Whether this buyer has never completed a purchase
    pub is_first_time_buyer: bool,
    /// Redemptions of this code across all users
    pub total_uses: Option<u32>,
    /// Redemptions of this code by this buyer
    pub user_uses: Option<u32>,
}

impl EligibilityContext {
    pub fn at(now: i64) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }
}

/// Decide whether `rule` may be applied to `cart`
pub fn evaluate(
    rule: &DiscountRule,
    cart: &[CartLineSnapshot],
    ctx: &EligibilityContext,
) -> Result<(), RejectionReason> {
    // 1. Validity window; deactivated rules behave like expired ones
    if !rule.is_active || !rule.is_within_window(ctx.now) {
        return Err(RejectionReason::Expired);
    }

    // 2. Usage caps, only when the rule enables them and a count is supplied
    if rule.usage_limit.enabled {
        if let (Some(cap), Some(used)) = (rule.usage_limit.total_uses, ctx.total_uses)
            && used >= cap
        {
            return Err(RejectionReason::UsageLimitReached);
        }
        if let (Some(cap), Some(used)) = (rule.usage_limit.per_user_limit, ctx.user_uses)
            && used >= cap
        {
            return Err(RejectionReason::UsageLimitReached);
        }
    }

    // 3. Type-specific condition
    match &rule.scope {
        DiscountScope::AllApps => {}
        DiscountScope::SpecificApps {
            applicable_item_ids,
        } => {
            if !cart
                .iter()
                .any(|line| applicable_item_ids.contains(&line.item_id))
            {
                return Err(RejectionReason::NoApplicableItems);
            }
        }
        DiscountScope::Bundle {
            applicable_item_ids,
            minimum_item_count,
        } => {
            let matching = cart
                .iter()
                .filter(|line| applicable_item_ids.contains(&line.item_id))
                .count();
            if matching == 0 {
                return Err(RejectionReason::NoApplicableItems);
            }
            if matching < *minimum_item_count as usize {
                return Err(RejectionReason::BundleThresholdNotMet);
            }
        }
        DiscountScope::MinimumTotal { minimum_amount } => {
            let sub = subtotal(cart, minimum_amount.currency());
            if sub < *minimum_amount {
                return Err(RejectionReason::MinimumNotMet);
            }
        }
        DiscountScope::FirstTimePurchase => {
            if !ctx.is_first_time_buyer {
                return Err(RejectionReason::NotFirstTimeBuyer);
            }
        }
    }

    // 4. Stacking against catalog promotions
    if !can_stack(rule, cart) {
        return Err(RejectionReason::PromotionConflict);
    }

    Ok(())
}
