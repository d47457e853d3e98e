use std::time::Duration;

use mockall::mock;

use crate::{
    db_types::{Order, OrderId},
    traits::{OrderStorage, PersistenceError, StorageError},
};

mock! {
    pub OrderStore {}
    impl OrderStorage for OrderStore {
        async fn save_order(&self, order: &Order) -> Result<(), PersistenceError>;
        async fn fetch_order(&self, order_uid: &OrderId) -> Result<Option<Order>, StorageError>;
        async fn fetch_all_orders(&self) -> Result<Vec<Order>, StorageError>;
    }
}

/// A backend that answers correctly, but only after `delay`. Every read returns `order`.
pub struct SlowOrderStore {
    pub delay: Duration,
    pub order: Option<Order>,
}

impl SlowOrderStore {
    pub fn new(delay: Duration, order: Option<Order>) -> Self {
        Self { delay, order }
    }
}

impl OrderStorage for SlowOrderStore {
    async fn save_order(&self, _order: &Order) -> Result<(), PersistenceError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn fetch_order(&self, _order_uid: &OrderId) -> Result<Option<Order>, StorageError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.order.clone())
    }

    async fn fetch_all_orders(&self) -> Result<Vec<Order>, StorageError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.order.iter().cloned().collect())
    }
}
