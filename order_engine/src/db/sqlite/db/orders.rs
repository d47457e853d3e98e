use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{OrderHeader, OrderId};

/// Inserts the order header, or replaces every column of the existing header with the same `order_uid`.
pub async fn upsert_order_header(header: &OrderHeader, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let result = sqlx::query(
        r#"
            INSERT INTO orders (
                order_uid,
                track_number,
                entry,
                locale,
                internal_signature,
                customer_id,
                delivery_service,
                shardkey,
                sm_id,
                date_created,
                oof_shard
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (order_uid) DO UPDATE SET
                track_number = excluded.track_number,
                entry = excluded.entry,
                locale = excluded.locale,
                internal_signature = excluded.internal_signature,
                customer_id = excluded.customer_id,
                delivery_service = excluded.delivery_service,
                shardkey = excluded.shardkey,
                sm_id = excluded.sm_id,
                date_created = excluded.date_created,
                oof_shard = excluded.oof_shard;
        "#,
    )
    .bind(header.order_uid.as_str())
    .bind(&header.track_number)
    .bind(&header.entry)
    .bind(&header.locale)
    .bind(&header.internal_signature)
    .bind(&header.customer_id)
    .bind(&header.delivery_service)
    .bind(&header.shardkey)
    .bind(header.sm_id)
    .bind(header.date_created)
    .bind(&header.oof_shard)
    .execute(conn)
    .await?;
    trace!("📝️ Order header [{}] upserted. {} rows affected", header.order_uid, result.rows_affected());
    Ok(())
}

/// Returns the header row for `order_uid`, or `None` if the order has never been stored.
pub async fn fetch_order_header(
    order_uid: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderHeader>, sqlx::Error> {
    let header = sqlx::query_as(
        r#"
        SELECT
            order_uid,
            track_number,
            entry,
            locale,
            internal_signature,
            customer_id,
            delivery_service,
            shardkey,
            sm_id,
            date_created,
            oof_shard
        FROM orders WHERE order_uid = $1"#,
    )
    .bind(order_uid.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(header)
}

/// Returns every header row, ordered by `order_uid`.
pub async fn fetch_all_order_headers(conn: &mut SqliteConnection) -> Result<Vec<OrderHeader>, sqlx::Error> {
    let headers = sqlx::query_as(
        r#"
        SELECT
            order_uid,
            track_number,
            entry,
            locale,
            internal_signature,
            customer_id,
            delivery_service,
            shardkey,
            sm_id,
            date_created,
            oof_shard
        FROM orders ORDER BY order_uid"#,
    )
    .fetch_all(conn)
    .await?;
    Ok(headers)
}
