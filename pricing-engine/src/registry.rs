//! Discount code registry
//!
//! Collaborator contract for rule lookup and the redemption ledger. Rules
//! are authored externally and read-only here; the only mutation is
//! [`DiscountRegistry::record_usage`], called once per completed purchase —
//! never during pricing previews, so a second apply click can't burn a use.

use crate::stacking::can_stack;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::discount_rule::RuleValidationError;
use shared::{CartLineSnapshot, DiscountRule, PricingError};
use std::collections::HashMap;
use thiserror::Error;

/// Redemption counters for one code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageCounters {
    /// Redemptions across all users
    pub total: u32,
    /// Redemptions by the queried user, when a user key was supplied
    pub by_user: Option<u32>,
}

/// Failures while recording a redemption
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UsageError {
    /// The cap was exhausted between preview and completion
    #[error("usage limit reached for code {0}")]
    LimitReached(String),
    #[error("unknown code {0}")]
    UnknownCode(String),
    #[error(transparent)]
    Infra(#[from] PricingError),
}

/// Lookup and redemption-ledger contract
#[async_trait]
pub trait DiscountRegistry: Send + Sync {
    /// Case-insensitive code lookup; codes are stored uppercase
    async fn find_by_code(&self, code: &str) -> Result<Option<DiscountRule>, PricingError>;

    /// Current redemption counters for a code
    async fn usage_counters(
        &self,
        code: &str,
        user_key: Option<&str>,
    ) -> Result<UsageCounters, PricingError>;

    /// Rules currently applicable to this cart, priority ascending
    ///
    /// For UI suggestion display only; pricing always goes through
    /// [`find_by_code`](Self::find_by_code) with an explicit code.
    async fn list_active_stackable(
        &self,
        cart: &[CartLineSnapshot],
        now: i64,
    ) -> Result<Vec<DiscountRule>, PricingError>;

    /// Record one redemption at purchase completion
    ///
    /// Must check-and-increment atomically against both the global and the
    /// per-user cap, so concurrent checkouts cannot overrun a nearly
    /// exhausted code.
    async fn record_usage(&self, code: &str, user_key: &str) -> Result<(), UsageError>;
}

#[derive(Debug, Default)]
struct CodeLedger {
    total: u32,
    by_user: HashMap<String, u32>,
}

/// In-memory registry with an RwLock'd rule map and redemption ledger
///
/// Reference implementation for tests; production callers put the CMS-backed
/// registry and a transactional ledger behind the same trait.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    rules: RwLock<HashMap<String, DiscountRule>>,
    ledger: RwLock<HashMap<String, CodeLedger>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a rule under its normalized code
    pub fn insert(&self, rule: DiscountRule) -> Result<(), RuleValidationError> {
        rule.validate()?;
        self.rules.write().insert(rule.normalized_code(), rule);
        Ok(())
    }
}

#[async_trait]
impl DiscountRegistry for InMemoryRegistry {
    async fn find_by_code(&self, code: &str) -> Result<Option<DiscountRule>, PricingError> {
        let normalized = DiscountRule::normalize_code(code);
        Ok(self.rules.read().get(&normalized).cloned())
    }

    async fn usage_counters(
        &self,
        code: &str,
        user_key: Option<&str>,
    ) -> Result<UsageCounters, PricingError> {
        let normalized = DiscountRule::normalize_code(code);
        let ledger = self.ledger.read();
        let Some(entry) = ledger.get(&normalized) else {
            return Ok(UsageCounters {
                total: 0,
                by_user: user_key.map(|_| 0),
            });
        };
        Ok(UsageCounters {
            total: entry.total,
            by_user: user_key.map(|key| entry.by_user.get(key).copied().unwrap_or(0)),
        })
    }

    async fn list_active_stackable(
        &self,
        cart: &[CartLineSnapshot],
        now: i64,
    ) -> Result<Vec<DiscountRule>, PricingError> {
        let rules = self.rules.read();
        let mut matches: Vec<DiscountRule> = rules
            .values()
            .filter(|rule| {
                rule.is_active
                    && rule.is_within_window(now)
                    && can_stack(rule, cart)
                    && cart.iter().any(|line| rule.scope.applies_to(&line.item_id))
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(matches)
    }

    async fn record_usage(&self, code: &str, user_key: &str) -> Result<(), UsageError> {
        let normalized = DiscountRule::normalize_code(code);
        let rules = self.rules.read();
        let Some(rule) = rules.get(&normalized) else {
            return Err(UsageError::UnknownCode(normalized));
        };

        // Single write lock spans check and increment
        let mut ledger = self.ledger.write();
        let entry = ledger.entry(normalized.clone()).or_default();

        if rule.usage_limit.enabled {
            if let Some(cap) = rule.usage_limit.total_uses
                && entry.total >= cap
            {
                return Err(UsageError::LimitReached(normalized));
            }
            if let Some(cap) = rule.usage_limit.per_user_limit
                && entry.by_user.get(user_key).copied().unwrap_or(0) >= cap
            {
                return Err(UsageError::LimitReached(normalized));
            }
        }

        entry.total += 1;
        *entry.by_user.entry(user_key.to_string()).or_insert(0) += 1;
        Ok(())
    }
}
