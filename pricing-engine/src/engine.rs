//! Pricing engine orchestrator
//!
//! Wires the pure pricing math to the catalog and registry collaborators.
//! Every invocation re-fetches catalog snapshots, so client-side carts can
//! never smuggle in stale prices; items the catalog no longer returns are
//! dropped from the cart and reported back for a user-visible notice.

use crate::calculator::{CodeLookup, price};
use crate::catalog::CatalogProvider;
use crate::eligibility::EligibilityContext;
use crate::registry::DiscountRegistry;
use shared::{
    CartLineSnapshot, DiscountRule, ItemId, PricingError, PricingResult, StoreConfig,
};
use std::sync::Arc;

/// Buyer/time facts for one pricing request
#[derive(Debug, Clone, Copy, Default)]
pub struct BuyerContext<'a> {
    /// Pricing time (Unix millis)
    pub now: i64,
    /// Whether this buyer has never completed a purchase
    pub is_first_time_buyer: bool,
    /// Opaque key for the per-user usage ledger (email, account id)
    pub user_key: Option<&'a str>,
}

impl<'a> BuyerContext<'a> {
    pub fn at(now: i64) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Context anchored at the wall clock
    pub fn now() -> Self {
        Self::at(chrono::Utc::now().timestamp_millis())
    }
}

/// Output of one pricing pass
#[derive(Debug, Clone, PartialEq)]
pub struct CartPricing {
    /// The receipt for the surviving lines
    pub result: PricingResult,
    /// Freshly priced lines, in cart order
    pub lines: Vec<CartLineSnapshot>,
    /// Items dropped because the catalog no longer sells them
    pub removed_items: Vec<ItemId>,
}

/// Discount & pricing engine
///
/// Holds no mutable state; carts and catalog snapshots are per-call inputs,
/// so the same engine value can serve concurrent requests.
#[derive(Clone)]
pub struct PricingEngine {
    catalog: Arc<dyn CatalogProvider>,
    registry: Arc<dyn DiscountRegistry>,
    config: StoreConfig,
}

impl std::fmt::Debug for PricingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingEngine")
            .field("catalog", &"<CatalogProvider>")
            .field("registry", &"<DiscountRegistry>")
            .field("config", &self.config)
            .finish()
    }
}

impl PricingEngine {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        registry: Arc<dyn DiscountRegistry>,
        config: StoreConfig,
    ) -> Self {
        Self {
            catalog,
            registry,
            config,
        }
    }

    /// Price a cart of item ids against an optional discount code
    ///
    /// Re-invoked on cart mutation, on code apply/remove, and periodically
    /// while the cart sits open. Returns `Err` only for infrastructure
    /// failures; every discount problem degrades to a full-price receipt
    /// with a rejection reason.
    pub async fn price_cart(
        &self,
        item_ids: &[ItemId],
        code: Option<&str>,
        buyer: BuyerContext<'_>,
    ) -> Result<CartPricing, PricingError> {
        let mut snapshots = self.catalog.get_current_prices(item_ids).await?;

        let mut lines = Vec::with_capacity(item_ids.len());
        let mut removed_items = Vec::new();
        for id in item_ids {
            match snapshots.remove(id) {
                Some(line) => {
                    self.check_currency(&line)?;
                    lines.push(line);
                }
                None => {
                    tracing::warn!(item_id = %id, "cart item no longer in catalog, dropping");
                    removed_items.push(id.clone());
                }
            }
        }

        let rule = match code {
            Some(c) => Some((c, self.registry.find_by_code(c).await?)),
            None => None,
        };

        let mut ctx = EligibilityContext::at(buyer.now);
        ctx.is_first_time_buyer = buyer.is_first_time_buyer;
        if let Some((c, Some(found))) = &rule
            && found.usage_limit.enabled
        {
            let counters = self.registry.usage_counters(c, buyer.user_key).await?;
            ctx.total_uses = Some(counters.total);
            ctx.user_uses = counters.by_user;
        }

        let lookup = match &rule {
            None => CodeLookup::None,
            Some((_, None)) => CodeLookup::NotFound,
            Some((_, Some(found))) => CodeLookup::Found(found),
        };

        let result = price(&lines, lookup, &ctx, self.config.currency);
        if let Some(reason) = result.rejected_reason {
            tracing::debug!(?reason, code = ?code, "discount code rejected");
        }

        Ok(CartPricing {
            result,
            lines,
            removed_items,
        })
    }

    /// Codes currently worth suggesting for this cart, priority ascending
    ///
    /// Display-only; applying one still goes through
    /// [`price_cart`](Self::price_cart).
    pub async fn suggestions(
        &self,
        cart: &[CartLineSnapshot],
        now: i64,
    ) -> Result<Vec<DiscountRule>, PricingError> {
        self.registry.list_active_stackable(cart, now).await
    }

    fn check_currency(&self, line: &CartLineSnapshot) -> Result<(), PricingError> {
        for money in [line.base_price, line.current_price] {
            if money.currency() != self.config.currency {
                return Err(PricingError::CurrencyMismatch {
                    item_id: line.item_id.clone(),
                    found: money.currency(),
                    expected: self.config.currency,
                });
            }
        }
        Ok(())
    }
}
