//! Pricing calculator
//!
//! Computes subtotal, per-rule discount amount and the final total.
//! Intermediate math is `Decimal`; the result is rounded half-up to the
//! minor unit exactly once, at the end of the whole-cart computation.
//! Summing per-line roundings would drift, so `price` deliberately does not
//! decompose into per-line totals.

use crate::eligibility::{EligibilityContext, evaluate};
use rust_decimal::Decimal;
use shared::money::{Currency, Money};
use shared::{CartLineSnapshot, DiscountRule, DiscountValue, PricingResult, RejectionReason};

/// Sum of current prices over the whole cart
pub fn subtotal(cart: &[CartLineSnapshot], currency: Currency) -> Money {
    cart.iter()
        .fold(Money::zero(currency), |acc, line| acc + line.current_price)
}

/// Discount base: the current prices the rule's scope covers
///
/// For `SpecificApps`/`Bundle` only matching lines participate; items
/// outside the scope stay in the total but not in the base.
fn discount_base(rule: &DiscountRule, cart: &[CartLineSnapshot], currency: Currency) -> Money {
    cart.iter()
        .filter(|line| rule.scope.applies_to(&line.item_id))
        .fold(Money::zero(currency), |acc, line| acc + line.current_price)
}

/// Discount amount for an already-accepted rule
///
/// Percentage discounts are computed in `Decimal`, rounded half-up once,
/// then clamped to `max_discount` when set. Fixed discounts never exceed
/// the base they apply to. Either way the result is finally clamped to the
/// cart subtotal, so a total can never go negative.
pub fn compute_discount(
    rule: &DiscountRule,
    cart: &[CartLineSnapshot],
    currency: Currency,
) -> Money {
    let base = discount_base(rule, cart, currency);

    let discount = match &rule.value {
        DiscountValue::Percentage {
            percent,
            max_discount,
        } => {
            let raw = base.to_decimal() * percent / Decimal::ONE_HUNDRED;
            let amount = Money::from_decimal(raw, currency);
            match max_discount {
                Some(cap) => amount.min(*cap),
                None => amount,
            }
        }
        DiscountValue::Fixed { amount } => amount.min(base),
    };

    discount.clamp_non_negative().min(subtotal(cart, currency))
}

/// Outcome of the registry lookup for the supplied code
#[derive(Debug, Clone, Copy, Default)]
pub enum CodeLookup<'a> {
    /// No code was supplied
    #[default]
    None,
    /// A code was supplied but the registry has no such rule
    NotFound,
    /// The registry's rule for the supplied code
    Found(&'a DiscountRule),
}

/// Price a cart against an optional, already-looked-up discount code
///
/// Pure and side-effect-free: identical inputs always produce an identical
/// receipt, so the client can safely re-evaluate any number of times before
/// payment capture. Rejections degrade to full price with a reason, never
/// to a failed checkout.
pub fn price(
    cart: &[CartLineSnapshot],
    code: CodeLookup<'_>,
    ctx: &EligibilityContext,
    currency: Currency,
) -> PricingResult {
    let sub = subtotal(cart, currency);

    match code {
        CodeLookup::None => PricingResult::undiscounted(sub),
        CodeLookup::NotFound => PricingResult::rejected(sub, RejectionReason::InvalidCode),
        CodeLookup::Found(rule) => match evaluate(rule, cart, ctx) {
            Err(reason) => PricingResult::rejected(sub, reason),
            Ok(()) => {
                let amount = compute_discount(rule, cart, currency);
                PricingResult::discounted(sub, rule.normalized_code(), amount)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{DiscountScope, UsageLimit};
    use std::collections::BTreeSet;

    const GHS: Currency = Currency::Ghs;

    fn ghs(minor: i64) -> Money {
        Money::from_minor(minor, GHS)
    }

    fn make_rule(scope: DiscountScope, value: DiscountValue) -> DiscountRule {
        DiscountRule {
            code: "TEST".to_string(),
            description: None,
            scope,
            value,
            usage_limit: UsageLimit::default(),
            valid_from: 0,
            valid_to: i64::MAX,
            stackable_with_promotions: true,
            priority: 1,
            is_active: true,
            created_at: 0,
        }
    }

    fn percentage(percent: i64) -> DiscountValue {
        DiscountValue::Percentage {
            percent: Decimal::from(percent),
            max_discount: None,
        }
    }

    fn line(id: &str, minor: i64) -> CartLineSnapshot {
        CartLineSnapshot::at_list_price(id, ghs(minor))
    }

    fn ids(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    // ==================== Subtotal ====================

    #[test]
    fn test_subtotal_empty_cart() {
        assert_eq!(subtotal(&[], GHS), ghs(0));
    }

    #[test]
    fn test_subtotal_uses_current_prices() {
        let cart = [
            line("a", 5_000),
            CartLineSnapshot::on_promotion("b", ghs(5_000), ghs(4_000)),
        ];
        assert_eq!(subtotal(&cart, GHS), ghs(9_000));
    }

    // ==================== Scenarios ====================

    #[test]
    fn test_scenario_a_percentage_all_apps() {
        // 100.00 GHS cart, 20% AllApps, no cap -> 20.00 off, 80.00 total
        let cart = [line("x", 10_000)];
        let rule = make_rule(DiscountScope::AllApps, percentage(20));

        let result = price(
            &cart,
            CodeLookup::Found(&rule),
            &EligibilityContext::at(1),
            GHS,
        );
        assert_eq!(result.discount_amount, ghs(2_000));
        assert_eq!(result.total, ghs(8_000));
        assert!(result.verify());
    }

    #[test]
    fn test_scenario_b_fixed_clamped_to_subtotal() {
        // 100.00 GHS cart, fixed 150.00 -> clamped to 100.00, total 0.00
        let cart = [line("x", 10_000)];
        let rule = make_rule(
            DiscountScope::AllApps,
            DiscountValue::Fixed {
                amount: ghs(15_000),
            },
        );

        let result = price(
            &cart,
            CodeLookup::Found(&rule),
            &EligibilityContext::at(1),
            GHS,
        );
        assert_eq!(result.discount_amount, ghs(10_000));
        assert_eq!(result.total, ghs(0));
        assert!(result.verify());
    }

    #[test]
    fn test_scenario_c_promotion_conflict() {
        // Non-stackable 10% against a cart with one promotional line
        let cart = [
            line("a", 5_000),
            CartLineSnapshot::on_promotion("b", ghs(6_000), ghs(5_000)),
        ];
        let mut rule = make_rule(DiscountScope::AllApps, percentage(10));
        rule.stackable_with_promotions = false;

        let result = price(
            &cart,
            CodeLookup::Found(&rule),
            &EligibilityContext::at(1),
            GHS,
        );
        assert_eq!(
            result.rejected_reason,
            Some(RejectionReason::PromotionConflict)
        );
        assert_eq!(result.discount_amount, ghs(0));
        assert_eq!(result.total, ghs(10_000));
    }

    #[test]
    fn test_scenario_e_expired_code_full_price() {
        let cart = [line("x", 10_000)];
        let mut rule = make_rule(DiscountScope::AllApps, percentage(20));
        rule.valid_from = 0;
        rule.valid_to = 100;

        let result = price(
            &cart,
            CodeLookup::Found(&rule),
            &EligibilityContext::at(200),
            GHS,
        );
        assert_eq!(result.rejected_reason, Some(RejectionReason::Expired));
        assert_eq!(result.total, result.subtotal);
    }

    // ==================== Base selection ====================

    #[test]
    fn test_specific_apps_base_excludes_other_items() {
        // 50% off items {a}: cart a=40.00, b=60.00
        // base = 40.00, discount = 20.00, total = 80.00
        let cart = [line("a", 4_000), line("b", 6_000)];
        let rule = make_rule(
            DiscountScope::SpecificApps {
                applicable_item_ids: ids(&["a"]),
            },
            percentage(50),
        );

        let result = price(
            &cart,
            CodeLookup::Found(&rule),
            &EligibilityContext::at(1),
            GHS,
        );
        assert_eq!(result.discount_amount, ghs(2_000));
        assert_eq!(result.total, ghs(8_000));
    }

    #[test]
    fn test_fixed_discount_clamped_to_scoped_base() {
        // Fixed 30.00 on items {a} where a costs 20.00: only 20.00 comes off
        let cart = [line("a", 2_000), line("b", 6_000)];
        let rule = make_rule(
            DiscountScope::SpecificApps {
                applicable_item_ids: ids(&["a"]),
            },
            DiscountValue::Fixed { amount: ghs(3_000) },
        );

        let result = price(
            &cart,
            CodeLookup::Found(&rule),
            &EligibilityContext::at(1),
            GHS,
        );
        assert_eq!(result.discount_amount, ghs(2_000));
        assert_eq!(result.total, ghs(6_000));
    }

    // ==================== Caps and rounding ====================

    #[test]
    fn test_percentage_cap() {
        // 20% of 500.00 = 100.00, capped at 30.00
        let cart = [line("x", 50_000)];
        let rule = make_rule(
            DiscountScope::AllApps,
            DiscountValue::Percentage {
                percent: Decimal::from(20),
                max_discount: Some(ghs(3_000)),
            },
        );

        let result = price(
            &cart,
            CodeLookup::Found(&rule),
            &EligibilityContext::at(1),
            GHS,
        );
        assert_eq!(result.discount_amount, ghs(3_000));
    }

    #[test]
    fn test_percentage_rounds_half_up_once() {
        // 15% of 33.35 = 5.0025 -> 5.00; 15% of 33.37 = 5.0055 -> 5.01
        let rule = make_rule(DiscountScope::AllApps, percentage(15));

        assert_eq!(compute_discount(&rule, &[line("a", 3_335)], GHS), ghs(500));
        assert_eq!(compute_discount(&rule, &[line("a", 3_337)], GHS), ghs(501));
    }

    #[test]
    fn test_total_then_round_semantics() {
        // 3 lines of 0.35 each at 10%: base 1.05 -> 0.11 (rounded once).
        // Per-line rounding would give 3 * 0.04 = 0.12.
        let cart = [line("a", 35), line("b", 35), line("c", 35)];
        let rule = make_rule(DiscountScope::AllApps, percentage(10));

        assert_eq!(compute_discount(&rule, &cart, GHS), ghs(11));
    }

    // ==================== price() plumbing ====================

    #[test]
    fn test_no_code_supplied() {
        let cart = [line("x", 10_000)];
        let result = price(&cart, CodeLookup::None, &EligibilityContext::at(1), GHS);

        assert_eq!(result, PricingResult::undiscounted(ghs(10_000)));
    }

    #[test]
    fn test_unknown_code_full_price_with_reason() {
        let cart = [line("x", 10_000)];
        let result = price(&cart, CodeLookup::NotFound, &EligibilityContext::at(1), GHS);

        assert_eq!(result.rejected_reason, Some(RejectionReason::InvalidCode));
        assert_eq!(result.total, ghs(10_000));
    }

    #[test]
    fn test_idempotence() {
        let cart = [line("a", 4_000), line("b", 6_000)];
        let rule = make_rule(DiscountScope::AllApps, percentage(12));
        let ctx = EligibilityContext::at(1);

        let first = price(&cart, CodeLookup::Found(&rule), &ctx, GHS);
        let second = price(&cart, CodeLookup::Found(&rule), &ctx, GHS);
        assert_eq!(first, second);
    }

    #[test]
    fn test_accepted_code_is_normalized_on_receipt() {
        let cart = [line("x", 10_000)];
        let mut rule = make_rule(DiscountScope::AllApps, percentage(10));
        rule.code = "launch20".to_string();

        let result = price(
            &cart,
            CodeLookup::Found(&rule),
            &EligibilityContext::at(1),
            GHS,
        );
        assert_eq!(result.discount_code.as_deref(), Some("LAUNCH20"));
    }
}
