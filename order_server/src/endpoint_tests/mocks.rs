use mockall::mock;
use order_engine::{
    db_types::{Order, OrderId},
    OrderStorage,
    PersistenceError,
    StorageError,
};

mock! {
    pub OrderStore {}
    impl OrderStorage for OrderStore {
        async fn save_order(&self, order: &Order) -> Result<(), PersistenceError>;
        async fn fetch_order(&self, order_uid: &OrderId) -> Result<Option<Order>, StorageError>;
        async fn fetch_all_orders(&self) -> Result<Vec<Order>, StorageError>;
    }
}
