use std::{fmt::Debug, sync::Arc, time::Duration};

use log::*;

use crate::{
    cache::OrderCache,
    db_types::{Order, OrderId},
    order_api::{errors::LookupError, DEFAULT_STORAGE_TIMEOUT},
    traits::OrderStorage,
};

/// `LookupApi` serves single orders. The cache is checked first; on a miss the order is read from the database, put
/// in the cache and returned.
pub struct LookupApi<B> {
    db: B,
    cache: OrderCache,
    timeout: Duration,
}

impl<B> Debug for LookupApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LookupApi ({} cached)", self.cache.len())
    }
}

impl<B> LookupApi<B> {
    pub fn new(db: B, cache: OrderCache) -> Self {
        Self { db, cache, timeout: DEFAULT_STORAGE_TIMEOUT }
    }

    /// Sets the deadline for a database read on a cache miss.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &OrderCache {
        &self.cache
    }
}

impl<B> LookupApi<B>
where B: OrderStorage
{
    /// Returns the order with the given id, or `None` if neither the cache nor the database has it.
    pub async fn lookup(&self, order_uid: &OrderId) -> Result<Option<Arc<Order>>, LookupError> {
        if let Some(order) = self.cache.get(order_uid) {
            trace!("🔍️ Cache hit for order [{order_uid}]");
            return Ok(Some(order));
        }
        trace!("🔍️ Cache miss for order [{order_uid}]. Reading from the database.");
        let fetched = tokio::time::timeout(self.timeout, self.db.fetch_order(order_uid))
            .await
            .map_err(|_| LookupError::TimedOut(self.timeout))??;
        match fetched {
            Some(order) => {
                let order = self.cache.fill(order);
                debug!("🔍️ Order [{order_uid}] read from the database and cached");
                Ok(Some(order))
            },
            None => {
                debug!("🔍️ Order [{order_uid}] not found");
                Ok(None)
            },
        }
    }
}
