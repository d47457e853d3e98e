use sqlx::{FromRow, SqliteConnection};

use crate::db_types::{OrderId, Payment};

#[derive(Debug, FromRow)]
pub struct PaymentRow {
    pub order_uid: OrderId,
    #[sqlx(flatten)]
    pub payment: Payment,
}

const PAYMENT_COLUMNS: &str = "transaction_id, request_id, currency, provider, amount, payment_dt, bank, \
                               delivery_cost, goods_total, custom_fee";

pub async fn upsert_payment(
    order_uid: &OrderId,
    payment: &Payment,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO payments (
                order_uid,
                transaction_id,
                request_id,
                currency,
                provider,
                amount,
                payment_dt,
                bank,
                delivery_cost,
                goods_total,
                custom_fee
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (order_uid) DO UPDATE SET
                transaction_id = excluded.transaction_id,
                request_id = excluded.request_id,
                currency = excluded.currency,
                provider = excluded.provider,
                amount = excluded.amount,
                payment_dt = excluded.payment_dt,
                bank = excluded.bank,
                delivery_cost = excluded.delivery_cost,
                goods_total = excluded.goods_total,
                custom_fee = excluded.custom_fee;
        "#,
    )
    .bind(order_uid.as_str())
    .bind(&payment.transaction)
    .bind(&payment.request_id)
    .bind(&payment.currency)
    .bind(&payment.provider)
    .bind(payment.amount)
    .bind(payment.payment_dt)
    .bind(&payment.bank)
    .bind(payment.delivery_cost)
    .bind(payment.goods_total)
    .bind(payment.custom_fee)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn fetch_payment(order_uid: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as(&format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_uid = $1"))
        .bind(order_uid.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

pub async fn fetch_all_payments(conn: &mut SqliteConnection) -> Result<Vec<PaymentRow>, sqlx::Error> {
    let rows = sqlx::query_as(&format!("SELECT order_uid, {PAYMENT_COLUMNS} FROM payments"))
        .fetch_all(conn)
        .await?;
    Ok(rows)
}
