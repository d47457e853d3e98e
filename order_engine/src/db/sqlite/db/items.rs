use log::trace;
use sqlx::{FromRow, SqliteConnection};

use crate::db_types::{Item, OrderId};

#[derive(Debug, FromRow)]
pub struct ItemRow {
    pub order_uid: OrderId,
    #[sqlx(flatten)]
    pub item: Item,
}

const ITEM_COLUMNS: &str =
    "chrt_id, track_number, price, rid, name, sale, size, total_price, nm_id, brand, status";

/// Replaces the stored item list for `order_uid` with `items`. The position of each item in the slice is stored so
/// that reads return the items in the same order.
///
/// This is not atomic on its own. Run it inside the same transaction as the rest of the order write.
pub async fn replace_items(order_uid: &OrderId, items: &[Item], conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let removed = sqlx::query("DELETE FROM items WHERE order_uid = $1")
        .bind(order_uid.as_str())
        .execute(&mut *conn)
        .await?
        .rows_affected();
    for (position, item) in items.iter().enumerate() {
        #[allow(clippy::cast_possible_wrap)]
        let position = position as i64;
        sqlx::query(
            r#"
            INSERT INTO items (
                order_uid,
                position,
                chrt_id,
                track_number,
                price,
                rid,
                name,
                sale,
                size,
                total_price,
                nm_id,
                brand,
                status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(order_uid.as_str())
        .bind(position)
        .bind(item.chrt_id)
        .bind(&item.track_number)
        .bind(item.price)
        .bind(&item.rid)
        .bind(&item.name)
        .bind(item.sale)
        .bind(&item.size)
        .bind(item.total_price)
        .bind(item.nm_id)
        .bind(&item.brand)
        .bind(item.status)
        .execute(&mut *conn)
        .await?;
    }
    trace!("📝️ Items for [{order_uid}] replaced. {removed} removed, {} inserted", items.len());
    Ok(())
}

pub async fn fetch_items(order_uid: &OrderId, conn: &mut SqliteConnection) -> Result<Vec<Item>, sqlx::Error> {
    let items = sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE order_uid = $1 ORDER BY position"))
        .bind(order_uid.as_str())
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// Every item row in the database, grouped by order and in stored order within each order.
pub async fn fetch_all_items(conn: &mut SqliteConnection) -> Result<Vec<ItemRow>, sqlx::Error> {
    let rows = sqlx::query_as(&format!("SELECT order_uid, {ITEM_COLUMNS} FROM items ORDER BY order_uid, position"))
        .fetch_all(conn)
        .await?;
    Ok(rows)
}
