//! # Buyable Source
//!
//! Basket rows store only a `(buyable_type, buyable_id)` back reference;
//! turning that reference into a live product is the catalog's job. The
//! catalog is external - [`BuyableSource`] is the narrow lookup view the
//! manager needs, injected at construction.
//!
//! [`MemoryBuyableSource`] is the reference implementation used by tests
//! and the demo binary.

use std::collections::HashMap;
use std::sync::Arc;

use basket_core::buyable::Buyable;

/// Resolves stored buyable references back into live products.
pub trait BuyableSource {
    /// Looks up a buyable by its type tag and id. `None` means the product
    /// is no longer known to the catalog.
    fn find(
        &self,
        buyable_type: &str,
        buyable_id: i64,
    ) -> impl std::future::Future<Output = Option<Arc<dyn Buyable>>> + Send;
}

/// In-memory buyable source backed by a map.
#[derive(Clone, Default)]
pub struct MemoryBuyableSource {
    buyables: HashMap<(String, i64), Arc<dyn Buyable>>,
}

impl MemoryBuyableSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a buyable under its own `(type, id)` reference.
    pub fn insert(&mut self, buyable: Arc<dyn Buyable>) {
        self.buyables.insert(
            (buyable.buyable_type().to_string(), buyable.buyable_id()),
            buyable,
        );
    }
}

impl BuyableSource for MemoryBuyableSource {
    async fn find(&self, buyable_type: &str, buyable_id: i64) -> Option<Arc<dyn Buyable>> {
        self.buyables
            .get(&(buyable_type.to_string(), buyable_id))
            .cloned()
    }
}
