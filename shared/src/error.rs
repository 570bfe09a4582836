//! Error and rejection types
//!
//! A discount that cannot be applied is not a failure: checkout proceeds at
//! full price and the [`RejectionReason`] is surfaced to the user. Only
//! collaborator/infrastructure problems become a [`PricingError`], which the
//! calling layer maps to a generic try-again response.

use crate::money::{Currency, MoneyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a discount code was not applied
///
/// Every variant is locally recoverable: the receipt falls back to full
/// price and the reason rides along for the UI to display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    /// Code not found in the registry
    InvalidCode,
    /// Now is outside the rule's validity window
    Expired,
    /// Global or per-user redemption cap reached
    UsageLimitReached,
    /// SpecificApps/Bundle rule with no matching cart line
    NoApplicableItems,
    /// Bundle rule with fewer matching lines than required
    BundleThresholdNotMet,
    /// Cart subtotal below the rule's threshold
    MinimumNotMet,
    /// FirstTimePurchase rule and the buyer has purchased before
    NotFirstTimeBuyer,
    /// Non-stackable code while a catalog promotion is active in the cart
    PromotionConflict,
}

impl RejectionReason {
    /// User-facing message for toast/inline display
    pub const fn message(&self) -> &'static str {
        match self {
            RejectionReason::InvalidCode => "This discount code is not valid",
            RejectionReason::Expired => "This discount code has expired",
            RejectionReason::UsageLimitReached => {
                "This discount code has reached its usage limit"
            }
            RejectionReason::NoApplicableItems => {
                "None of the items in your cart qualify for this code"
            }
            RejectionReason::BundleThresholdNotMet => {
                "Your cart does not contain enough qualifying items for this bundle"
            }
            RejectionReason::MinimumNotMet => {
                "Your cart total is below the minimum for this code"
            }
            RejectionReason::NotFirstTimeBuyer => {
                "This code is only available on a first purchase"
            }
            RejectionReason::PromotionConflict => {
                "This code cannot be combined with items already on sale"
            }
        }
    }
}

/// Infrastructure-level pricing failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Catalog service unreachable or returned a malformed snapshot
    #[error("catalog lookup failed: {0}")]
    Catalog(String),
    /// Discount registry unreachable
    #[error("discount registry lookup failed: {0}")]
    Registry(String),
    /// A cart line is priced in a currency other than the store's
    #[error("cart line '{item_id}' priced in {found}, store currency is {expected}")]
    CurrencyMismatch {
        item_id: String,
        found: Currency,
        expected: Currency,
    },
    #[error(transparent)]
    Money(#[from] MoneyError),
}
