//! Pricing receipt
//!
//! The engine's only output contract, consumed by the checkout UI and, at
//! purchase completion, stored immutably on the purchase record. The stored
//! `total` must exactly equal the amount captured by the payment gateway.

use crate::error::RejectionReason;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Deterministic pricing output for one cart/code/time input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingResult {
    /// Sum of current prices over the whole cart
    pub subtotal: Money,
    /// Applied code, present only when the discount was accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    /// Amount taken off the subtotal; zero when no code applied
    pub discount_amount: Money,
    /// `subtotal - discount_amount`, never negative
    pub total: Money,
    /// Why the supplied code was not applied, if it was not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_reason: Option<RejectionReason>,
}

impl PricingResult {
    /// Receipt with no code applied
    pub fn undiscounted(subtotal: Money) -> Self {
        Self {
            subtotal,
            discount_code: None,
            discount_amount: Money::zero(subtotal.currency()),
            total: subtotal,
            rejected_reason: None,
        }
    }

    /// Receipt for an accepted code; the discount is clamped to the subtotal
    pub fn discounted(subtotal: Money, code: impl Into<String>, discount_amount: Money) -> Self {
        let discount_amount = discount_amount.clamp_non_negative().min(subtotal);
        Self {
            subtotal,
            discount_code: Some(code.into()),
            total: subtotal - discount_amount,
            discount_amount,
            rejected_reason: None,
        }
    }

    /// Receipt for a rejected code: full price plus the reason
    pub fn rejected(subtotal: Money, reason: RejectionReason) -> Self {
        Self {
            subtotal,
            discount_code: None,
            discount_amount: Money::zero(subtotal.currency()),
            total: subtotal,
            rejected_reason: Some(reason),
        }
    }

    /// Whether a discount was actually applied
    pub fn is_discounted(&self) -> bool {
        self.discount_code.is_some() && self.discount_amount.is_positive()
    }

    /// Check the receipt's arithmetic invariants
    ///
    /// `total = subtotal - discount_amount`, `discount_amount >= 0`,
    /// `total >= 0`. Holds by construction; consumers about to persist a
    /// purchase record can re-verify before capture.
    pub fn verify(&self) -> bool {
        !self.discount_amount.is_negative()
            && !self.total.is_negative()
            && self.total == self.subtotal - self.discount_amount
    }
}
