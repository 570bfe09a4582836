//! Discount rule model
//!
//! Rules are authored externally (CMS) and are read-only to the engine.
//! The discount type drives which fields are relevant, so the type/value
//! pairs are modeled as tagged unions: the evaluator and calculator match
//! exhaustively and can never read a field that does not apply.

use crate::models::cart::ItemId;
use crate::money::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Lowest (first-evaluated) rule priority
pub const PRIORITY_MIN: u8 = 1;
/// Highest (last-evaluated) rule priority
pub const PRIORITY_MAX: u8 = 10;

/// Which carts a rule targets and the condition gating it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "discount_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountScope {
    /// Applies to every item in the cart
    AllApps,
    /// Applies only to the listed items
    SpecificApps { applicable_item_ids: BTreeSet<ItemId> },
    /// Applies to the whole cart once the subtotal reaches a threshold
    MinimumTotal { minimum_amount: Money },
    /// Applies to the whole cart for first-time buyers only
    FirstTimePurchase,
    /// Applies to the listed items once enough of them are in the cart
    Bundle {
        applicable_item_ids: BTreeSet<ItemId>,
        minimum_item_count: u32,
    },
}

impl DiscountScope {
    /// Whether a cart line with this item id participates in the discount base
    pub fn applies_to(&self, item_id: &str) -> bool {
        match self {
            DiscountScope::AllApps
            | DiscountScope::MinimumTotal { .. }
            | DiscountScope::FirstTimePurchase => true,
            DiscountScope::SpecificApps {
                applicable_item_ids,
            }
            | DiscountScope::Bundle {
                applicable_item_ids,
                ..
            } => applicable_item_ids.contains(item_id),
        }
    }
}

/// How the reduction is computed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "value_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountValue {
    /// Percentage of the discount base, optionally capped
    Percentage {
        percent: Decimal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_discount: Option<Money>,
    },
    /// Fixed amount, never more than the base it applies to
    Fixed { amount: Money },
}

/// Usage caps for a code
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageLimit {
    /// Caps are only enforced when enabled
    #[serde(default)]
    pub enabled: bool,
    /// Total redemptions across all users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_uses: Option<u32>,
    /// Redemptions per user key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_user_limit: Option<u32>,
}

/// Discount rule entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountRule {
    /// Unique code, case-insensitive, stored uppercase
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub scope: DiscountScope,
    #[serde(flatten)]
    pub value: DiscountValue,
    #[serde(default)]
    pub usage_limit: UsageLimit,
    /// Valid from datetime (Unix millis), inclusive
    pub valid_from: i64,
    /// Valid until datetime (Unix millis), inclusive; strictly after `valid_from`
    pub valid_to: i64,
    /// Whether the code may combine with catalog promotions
    #[serde(default)]
    pub stackable_with_promotions: bool,
    /// 1..=10, 1 evaluated first when multiple rules could apply
    pub priority: u8,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp (Unix millis)
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl DiscountRule {
    /// Canonical form of a code: trimmed, uppercase
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// This rule's code in canonical form
    pub fn normalized_code(&self) -> String {
        Self::normalize_code(&self.code)
    }

    /// Whether `now` (Unix millis) falls inside the validity window
    pub fn is_within_window(&self, now: i64) -> bool {
        now >= self.valid_from && now <= self.valid_to
    }

    /// Structural validation, for the authoring layer feeding the registry
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if Self::normalize_code(&self.code).is_empty() {
            return Err(RuleValidationError::EmptyCode);
        }
        if self.valid_to <= self.valid_from {
            return Err(RuleValidationError::WindowInverted {
                valid_from: self.valid_from,
                valid_to: self.valid_to,
            });
        }
        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&self.priority) {
            return Err(RuleValidationError::PriorityOutOfRange(self.priority));
        }

        match &self.value {
            DiscountValue::Percentage {
                percent,
                max_discount,
            } => {
                if *percent <= Decimal::ZERO || *percent > Decimal::ONE_HUNDRED {
                    return Err(RuleValidationError::PercentOutOfRange(*percent));
                }
                if let Some(cap) = max_discount
                    && !cap.is_positive()
                {
                    return Err(RuleValidationError::NonPositiveAmount("max_discount"));
                }
            }
            DiscountValue::Fixed { amount } => {
                if !amount.is_positive() {
                    return Err(RuleValidationError::NonPositiveAmount("amount"));
                }
            }
        }

        match &self.scope {
            DiscountScope::SpecificApps {
                applicable_item_ids,
            } if applicable_item_ids.is_empty() => Err(RuleValidationError::NoApplicableIds),
            DiscountScope::Bundle {
                applicable_item_ids,
                minimum_item_count,
            } => {
                if applicable_item_ids.is_empty() {
                    Err(RuleValidationError::NoApplicableIds)
                } else if *minimum_item_count < 1 {
                    Err(RuleValidationError::BundleCountTooSmall)
                } else {
                    Ok(())
                }
            }
            DiscountScope::MinimumTotal { minimum_amount } if !minimum_amount.is_positive() => {
                Err(RuleValidationError::NonPositiveAmount("minimum_amount"))
            }
            _ => Ok(()),
        }
    }
}

/// Structural problems in an authored rule
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleValidationError {
    #[error("code must not be empty")]
    EmptyCode,
    #[error("valid_to ({valid_to}) must be strictly after valid_from ({valid_from})")]
    WindowInverted { valid_from: i64, valid_to: i64 },
    #[error("priority {0} outside 1..=10")]
    PriorityOutOfRange(u8),
    #[error("percentage {0} outside (0, 100]")]
    PercentOutOfRange(Decimal),
    #[error("{0} must be positive")]
    NonPositiveAmount(&'static str),
    #[error("applicable_item_ids must not be empty")]
    NoApplicableIds,
    #[error("bundle minimum_item_count must be at least 1")]
    BundleCountTooSmall,
}
