//! `SqliteDatabase` is the concrete storage gateway for the order service.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`OrderStorage`] trait.
use std::{collections::HashMap, fmt::Debug, time::Duration};

use log::*;
use sqlx::{SqliteConnection, SqlitePool};

use super::db::{deliveries, items, new_pool, orders, payments};
use crate::{
    db_types::{Delivery, Item, Order, OrderId, Payment},
    traits::{OrderStorage, PersistenceError, StorageError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderStorage for SqliteDatabase {
    /// Takes an order, and in a single atomic transaction,
    /// * upserts the header row,
    /// * upserts the delivery row,
    /// * upserts the payment row,
    /// * replaces the item rows.
    ///
    /// If any step fails, the transaction is rolled back and the error names the failing stage.
    async fn save_order(&self, order: &Order) -> Result<(), PersistenceError> {
        let mut tx = self.pool.begin().await.map_err(PersistenceError::BeginFailed)?;
        if let Err(e) = write_order(order, &mut tx).await {
            debug!("🗃️ Order [{}] could not be written at stage '{}'. Rolling back.", order.order_uid, e.stage());
            if let Err(rollback_err) = tx.rollback().await {
                warn!("🗃️ Rollback for order [{}] failed: {rollback_err}", order.order_uid);
            }
            return Err(e);
        }
        tx.commit().await.map_err(PersistenceError::CommitFailed)?;
        debug!("🗃️ Order [{}] has been saved in the DB with {} items", order.order_uid, order.items.len());
        Ok(())
    }

    async fn fetch_order(&self, order_uid: &OrderId) -> Result<Option<Order>, StorageError> {
        // A read transaction gives the four queries a consistent snapshot.
        let mut tx = self.pool.begin().await?;
        let header = match orders::fetch_order_header(order_uid, &mut tx).await? {
            Some(h) => h,
            None => {
                trace!("🗃️ Order [{order_uid}] does not exist");
                tx.commit().await?;
                return Ok(None);
            },
        };
        let delivery = deliveries::fetch_delivery(order_uid, &mut tx).await?.unwrap_or_else(|| {
            warn!("🗃️ Order [{order_uid}] has no delivery record. Using an empty one.");
            Delivery::default()
        });
        let payment = payments::fetch_payment(order_uid, &mut tx).await?.unwrap_or_else(|| {
            warn!("🗃️ Order [{order_uid}] has no payment record. Using an empty one.");
            Payment::default()
        });
        let items = items::fetch_items(order_uid, &mut tx).await?;
        tx.commit().await?;
        Ok(Some(Order::from_parts(header, delivery, payment, items)))
    }

    async fn fetch_all_orders(&self) -> Result<Vec<Order>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let orders = read_all_orders(&mut tx).await?;
        tx.commit().await?;
        Ok(orders)
    }
}

async fn write_order(order: &Order, conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let id = &order.order_uid;
    orders::upsert_order_header(&order.header(), conn).await.map_err(PersistenceError::HeaderInsertFailed)?;
    deliveries::upsert_delivery(id, &order.delivery, conn).await.map_err(PersistenceError::DeliveryInsertFailed)?;
    payments::upsert_payment(id, &order.payment, conn).await.map_err(PersistenceError::PaymentInsertFailed)?;
    items::replace_items(id, &order.items, conn).await.map_err(PersistenceError::ItemInsertFailed)?;
    Ok(())
}

async fn read_all_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let headers = orders::fetch_all_order_headers(conn).await?;
    let mut deliveries: HashMap<OrderId, Delivery> =
        deliveries::fetch_all_deliveries(conn).await?.into_iter().map(|r| (r.order_uid, r.delivery)).collect();
    let mut payments: HashMap<OrderId, Payment> =
        payments::fetch_all_payments(conn).await?.into_iter().map(|r| (r.order_uid, r.payment)).collect();
    let mut items = items::fetch_all_items(conn).await?.into_iter().fold(
        HashMap::<OrderId, Vec<Item>>::new(),
        |mut acc, row| {
            acc.entry(row.order_uid).or_default().push(row.item);
            acc
        },
    );
    trace!(
        "🗃️ Read {} headers, {} deliveries, {} payments and items for {} orders",
        headers.len(),
        deliveries.len(),
        payments.len(),
        items.len()
    );
    let orders = headers
        .into_iter()
        .map(|header| {
            let id = &header.order_uid;
            let delivery = deliveries.remove(id).unwrap_or_else(|| {
                warn!("🗃️ Order [{id}] has no delivery record. Using an empty one.");
                Delivery::default()
            });
            let payment = payments.remove(id).unwrap_or_else(|| {
                warn!("🗃️ Order [{id}] has no payment record. Using an empty one.");
                Payment::default()
            });
            let order_items = items.remove(id).unwrap_or_default();
            Order::from_parts(header, delivery, payment, order_items)
        })
        .collect();
    Ok(orders)
}

impl SqliteDatabase {
    /// Creates a new database API object. `timeout` bounds connection acquisition and lock waits.
    pub async fn new_with_url(url: &str, max_connections: u32, timeout: Duration) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections, timeout).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// The URL of the database
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Applies the embedded schema migrations. Already-applied migrations are skipped.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
