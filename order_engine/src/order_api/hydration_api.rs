use std::{fmt::Debug, time::Duration};

use log::*;

use crate::{
    cache::OrderCache,
    order_api::{errors::HydrationError, DEFAULT_HYDRATION_TIMEOUT},
    traits::OrderStorage,
};

/// `HydrationApi` rebuilds the cache from the database. Run [`HydrationApi::hydrate_all`] once at startup, before
/// the ingestion loop or the lookup service start.
pub struct HydrationApi<B> {
    db: B,
    cache: OrderCache,
    timeout: Duration,
}

impl<B> Debug for HydrationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HydrationApi ({:?})", self.timeout)
    }
}

impl<B> HydrationApi<B> {
    pub fn new(db: B, cache: OrderCache) -> Self {
        Self { db, cache, timeout: DEFAULT_HYDRATION_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<B> HydrationApi<B>
where B: OrderStorage
{
    /// Loads every stored order, with its delivery, payment and items, into the cache.
    ///
    /// Returns the number of orders added. Orders that are already cached are left alone.
    pub async fn hydrate_all(&self) -> Result<usize, HydrationError> {
        info!("🚰️ Hydrating the order cache from the database");
        let orders = tokio::time::timeout(self.timeout, self.db.fetch_all_orders())
            .await
            .map_err(|_| HydrationError::TimedOut(self.timeout))??;
        let total = orders.len();
        let loaded = self.cache.bulk_load(orders);
        if loaded < total {
            debug!("🚰️ {} orders were already cached and were not replaced", total - loaded);
        }
        info!("🚰️ Cache hydrated with {loaded} orders");
        Ok(loaded)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        db_types::{Delivery, Item, Order, Payment},
        traits::{
            mocks::{MockOrderStore, SlowOrderStore},
            StorageError,
        },
    };

    fn full_order(id: &str) -> Order {
        Order {
            order_uid: id.into(),
            delivery: Delivery { name: format!("customer {id}"), ..Default::default() },
            payment: Payment { transaction: id.into(), amount: 100, ..Default::default() },
            items: vec![Item { nm_id: 7, ..Default::default() }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn hydrates_every_order_in_full() {
        let _ = env_logger::try_init();
        let mut db = MockOrderStore::new();
        db.expect_fetch_all_orders().times(1).returning(|| Ok(vec![full_order("o1"), full_order("o2")]));
        let cache = OrderCache::new();
        let api = HydrationApi::new(db, cache.clone());
        assert_eq!(api.hydrate_all().await.unwrap(), 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(*cache.get(&"o1".into()).unwrap(), full_order("o1"));
        assert_eq!(*cache.get(&"o2".into()).unwrap(), full_order("o2"));
    }

    #[tokio::test]
    async fn storage_failure_is_fatal() {
        let mut db = MockOrderStore::new();
        db.expect_fetch_all_orders().returning(|| Err(StorageError::DriverError(sqlx::Error::PoolClosed)));
        let cache = OrderCache::new();
        let api = HydrationApi::new(db, cache.clone());
        assert!(matches!(api.hydrate_all().await, Err(HydrationError::StorageError(_))));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn slow_hydration_times_out_and_loads_nothing() {
        let _ = env_logger::try_init();
        let db = SlowOrderStore::new(Duration::from_millis(200), Some(full_order("o1")));
        let cache = OrderCache::new();
        let api = HydrationApi::new(db, cache.clone()).with_timeout(Duration::from_millis(20));
        let err = api.hydrate_all().await.expect_err("hydration should time out");
        assert!(matches!(err, HydrationError::TimedOut(d) if d == Duration::from_millis(20)));
        assert!(cache.is_empty());
    }
}
