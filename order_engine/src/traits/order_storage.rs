use std::time::Duration;

use thiserror::Error;

use crate::db_types::{Order, OrderId};

/// Errors raised while writing an order. Each variant identifies the stage of the write transaction that failed and
/// wraps the underlying driver error. Any of these errors means the transaction was rolled back and none of the
/// order's rows were changed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Could not begin the write transaction. {0}")]
    BeginFailed(sqlx::Error),
    #[error("Could not write the order header. {0}")]
    HeaderInsertFailed(sqlx::Error),
    #[error("Could not write the delivery record. {0}")]
    DeliveryInsertFailed(sqlx::Error),
    #[error("Could not write the payment record. {0}")]
    PaymentInsertFailed(sqlx::Error),
    #[error("Could not write the order items. {0}")]
    ItemInsertFailed(sqlx::Error),
    #[error("Could not commit the write transaction. {0}")]
    CommitFailed(sqlx::Error),
    #[error("The write did not complete within {0:?} and was abandoned")]
    TimedOut(Duration),
}

impl PersistenceError {
    /// A short name for the stage that failed, suitable for logs and metrics labels.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::BeginFailed(_) => "begin",
            Self::HeaderInsertFailed(_) => "orders",
            Self::DeliveryInsertFailed(_) => "deliveries",
            Self::PaymentInsertFailed(_) => "payments",
            Self::ItemInsertFailed(_) => "items",
            Self::CommitFailed(_) => "commit",
            Self::TimedOut(_) => "timeout",
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database driver error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Could not apply database migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

/// The storage gateway used by the persistence writer, the lookup service and the cache hydrator.
#[allow(async_fn_in_trait)]
pub trait OrderStorage {
    /// Writes the order header, delivery, payment and items in a single atomic transaction.
    ///
    /// Existing header, delivery and payment rows for the same `order_uid` are replaced with the new values, and the
    /// stored item list is replaced by `order.items`. Writing the same order any number of times therefore leaves
    /// exactly one copy of each row.
    async fn save_order(&self, order: &Order) -> Result<(), PersistenceError>;

    /// Reads a complete order. Returns `Ok(None)` if there is no header row for `order_uid`.
    ///
    /// Missing delivery or payment rows are not an error; the corresponding sub-record is left at its default value.
    async fn fetch_order(&self, order_uid: &OrderId) -> Result<Option<Order>, StorageError>;

    /// Reads every stored order, fully assembled.
    async fn fetch_all_orders(&self) -> Result<Vec<Order>, StorageError>;
}
