use sqlx::{FromRow, SqliteConnection};

use crate::db_types::{Delivery, OrderId};

#[derive(Debug, FromRow)]
pub struct DeliveryRow {
    pub order_uid: OrderId,
    #[sqlx(flatten)]
    pub delivery: Delivery,
}

pub async fn upsert_delivery(
    order_uid: &OrderId,
    delivery: &Delivery,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO deliveries (order_uid, name, phone, zip, city, address, region, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (order_uid) DO UPDATE SET
                name = excluded.name,
                phone = excluded.phone,
                zip = excluded.zip,
                city = excluded.city,
                address = excluded.address,
                region = excluded.region,
                email = excluded.email;
        "#,
    )
    .bind(order_uid.as_str())
    .bind(&delivery.name)
    .bind(&delivery.phone)
    .bind(&delivery.zip)
    .bind(&delivery.city)
    .bind(&delivery.address)
    .bind(&delivery.region)
    .bind(&delivery.email)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn fetch_delivery(order_uid: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Delivery>, sqlx::Error> {
    let delivery = sqlx::query_as(
        "SELECT name, phone, zip, city, address, region, email FROM deliveries WHERE order_uid = $1",
    )
    .bind(order_uid.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(delivery)
}

pub async fn fetch_all_deliveries(conn: &mut SqliteConnection) -> Result<Vec<DeliveryRow>, sqlx::Error> {
    let rows = sqlx::query_as("SELECT order_uid, name, phone, zip, city, address, region, email FROM deliveries")
        .fetch_all(conn)
        .await?;
    Ok(rows)
}
