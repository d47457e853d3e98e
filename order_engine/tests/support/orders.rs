use chrono::{TimeZone, Utc};
use order_engine::db_types::{Delivery, Item, Order, Payment};

pub fn item(nm_id: i64) -> Item {
    Item {
        chrt_id: 9934930,
        track_number: "WBILMTESTTRACK".into(),
        price: 453,
        rid: format!("rid-{nm_id}"),
        name: "Mascaras".into(),
        sale: 30,
        size: "0".into(),
        total_price: 317,
        nm_id,
        brand: "Vivienne Sabo".into(),
        status: 202,
    }
}

/// An order with every field populated.
pub fn full_order(id: &str) -> Order {
    Order {
        order_uid: id.into(),
        track_number: "WBILMTESTTRACK".into(),
        entry: "WBIL".into(),
        delivery: Delivery {
            name: "Test Testov".into(),
            phone: "+9720000000".into(),
            zip: "2639809".into(),
            city: "Kiryat Mozkin".into(),
            address: "Ploshad Mira 15".into(),
            region: "Kraiot".into(),
            email: "test@gmail.com".into(),
        },
        payment: Payment {
            transaction: id.into(),
            request_id: String::new(),
            currency: "USD".into(),
            provider: "wbpay".into(),
            amount: 1817,
            payment_dt: 1637907727,
            bank: "alpha".into(),
            delivery_cost: 1500,
            goods_total: 317,
            custom_fee: 0,
        },
        items: vec![item(2389212)],
        locale: "en".into(),
        internal_signature: String::new(),
        customer_id: "test".into(),
        delivery_service: "meest".into(),
        shardkey: "9".into(),
        sm_id: 99,
        date_created: Utc.with_ymd_and_hms(2021, 11, 26, 6, 22, 19).unwrap(),
        oof_shard: "1".into(),
    }
}

pub fn to_json(order: &Order) -> Vec<u8> {
    serde_json::to_vec(order).expect("orders always serialize")
}
