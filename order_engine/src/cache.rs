//! # Order cache
//!
//! A process-wide map from order id to a fully hydrated [`Order`]. It is shared by the ingestion loop (which replaces
//! entries after every successful write) and by the lookup handlers (which fill it on a cache miss).
//!
//! Entries are stored as `Arc<Order>` and are only ever swapped as a whole, so readers always see either no entry or a
//! complete order. The map is sharded and locked internally by [`DashMap`], which covers every read and write.
//!
//! The cache is unbounded. Its size is bounded by whatever retention policy the backing database has. An entry is
//! only removed when a write's outcome is unknown, so that the next lookup reads the stored version back.
use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use log::trace;

use crate::db_types::{Order, OrderId};

#[derive(Debug, Clone, Default)]
pub struct OrderCache {
    orders: Arc<DashMap<OrderId, Arc<Order>>>,
}

impl OrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, order_uid: &OrderId) -> Option<Arc<Order>> {
        self.orders.get(order_uid).map(|entry| Arc::clone(entry.value()))
    }

    /// Stores `order`, replacing any existing entry for the same id. Last writer wins.
    pub fn put(&self, order: Order) -> Arc<Order> {
        let order = Arc::new(order);
        let previous = self.orders.insert(order.order_uid.clone(), Arc::clone(&order));
        trace!("🧠️ Cached order [{}] (replaced: {})", order.order_uid, previous.is_some());
        order
    }

    /// Stores `order` only if there is no entry for its id yet, and returns whichever order is now resident.
    ///
    /// Read paths use this so that an order fetched from the database never overwrites a newer version that was put
    /// by the ingestion loop in the meantime.
    pub fn fill(&self, order: Order) -> Arc<Order> {
        match self.orders.entry(order.order_uid.clone()) {
            Entry::Occupied(existing) => {
                trace!("🧠️ Order [{}] is already cached. Keeping the resident copy.", order.order_uid);
                Arc::clone(existing.get())
            },
            Entry::Vacant(slot) => Arc::clone(slot.insert(Arc::new(order)).value()),
        }
    }

    /// Fills the cache from an iterator of orders. Orders whose id is already cached are skipped.
    /// Returns the number of orders that were inserted.
    pub fn bulk_load<I: IntoIterator<Item = Order>>(&self, orders: I) -> usize {
        orders.into_iter().fold(0, |loaded, order| match self.orders.entry(order.order_uid.clone()) {
            Entry::Occupied(_) => loaded,
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(order));
                loaded + 1
            },
        })
    }

    /// Drops the entry for `order_uid`, returning it if there was one.
    pub fn remove(&self, order_uid: &OrderId) -> Option<Arc<Order>> {
        let removed = self.orders.remove(order_uid).map(|(_, order)| order);
        trace!("🧠️ Evicted order [{order_uid}] (was cached: {})", removed.is_some());
        removed
    }

    pub fn contains(&self, order_uid: &OrderId) -> bool {
        self.orders.contains_key(order_uid)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
