use std::{fmt::Debug, sync::Arc, time::Duration};

use log::*;

use crate::{
    cache::OrderCache,
    db_types::Order,
    order_api::DEFAULT_STORAGE_TIMEOUT,
    traits::{OrderStorage, PersistenceError},
};

/// `PersistenceApi` is the write path of the order engine. It writes an order through to the database and, only once
/// the write has committed, replaces the cached copy.
pub struct PersistenceApi<B> {
    db: B,
    cache: OrderCache,
    timeout: Duration,
}

impl<B> Debug for PersistenceApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PersistenceApi ({:?})", self.timeout)
    }
}

impl<B> PersistenceApi<B> {
    pub fn new(db: B, cache: OrderCache) -> Self {
        Self { db, cache, timeout: DEFAULT_STORAGE_TIMEOUT }
    }

    /// Sets the deadline for a single order write.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &OrderCache {
        &self.cache
    }
}

impl<B> PersistenceApi<B>
where B: OrderStorage
{
    /// Writes `order` atomically to every table and then puts it in the cache, replacing any previous version.
    ///
    /// On error nothing is written and the cache is untouched. If the deadline passes, the write is abandoned and its
    /// transaction rolled back. A deadline that expires during the commit itself may still leave the order stored, so
    /// the cached copy is evicted and the next lookup reads whichever version the database holds. Writing the same
    /// order again is idempotent.
    pub async fn save(&self, order: Order) -> Result<Arc<Order>, PersistenceError> {
        let id = order.order_uid.clone();
        match tokio::time::timeout(self.timeout, self.db.save_order(&order)).await {
            Ok(Ok(())) => {},
            Ok(Err(e)) => {
                warn!("💾️ Order [{id}] was not saved. {e}");
                return Err(e);
            },
            Err(_) => {
                warn!("💾️ Order [{id}] was not saved within {:?}. Evicting it from the cache.", self.timeout);
                self.cache.remove(&id);
                return Err(PersistenceError::TimedOut(self.timeout));
            },
        }
        let cached = self.cache.put(order);
        debug!("💾️ Order [{id}] saved and cached");
        Ok(cached)
    }
}
