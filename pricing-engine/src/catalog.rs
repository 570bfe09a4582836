//! Catalog snapshot provider
//!
//! The engine never trusts prices cached on the client: every pricing pass
//! asks the catalog for fresh snapshots of the cart's item ids. Items the
//! catalog no longer returns are treated as removed from sale.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::{CartLineSnapshot, ItemId, PricingError};
use std::collections::HashMap;

/// Source of authoritative price/promotion state
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fresh snapshots for the requested ids
    ///
    /// Ids absent from the returned map are no longer for sale; the caller
    /// drops them from the cart and prices the remainder.
    async fn get_current_prices(
        &self,
        item_ids: &[ItemId],
    ) -> Result<HashMap<ItemId, CartLineSnapshot>, PricingError>;
}

/// In-memory catalog backed by an RwLock'd map
///
/// Reference implementation for tests and seed data; production callers
/// wire the CMS-backed catalog behind the same trait.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: RwLock<HashMap<ItemId, CartLineSnapshot>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item's snapshot
    pub fn upsert(&self, line: CartLineSnapshot) {
        self.items.write().insert(line.item_id.clone(), line);
    }

    /// Remove an item from sale
    pub fn remove(&self, item_id: &str) -> Option<CartLineSnapshot> {
        self.items.write().remove(item_id)
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn get_current_prices(
        &self,
        item_ids: &[ItemId],
    ) -> Result<HashMap<ItemId, CartLineSnapshot>, PricingError> {
        let items = self.items.read();
        Ok(item_ids
            .iter()
            .filter_map(|id| items.get(id).cloned().map(|line| (id.clone(), line)))
            .collect())
    }
}
