use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use order_engine::{
    db_types::{Delivery, Item, Order, OrderId, Payment},
    LookupApi,
    OrderCache,
    StorageError,
};
use serde_json::Value;

use super::helpers::get_request;
use crate::{
    endpoint_tests::mocks::MockOrderStore,
    routes::{health, OrderByIdRoute},
};

fn stored_order() -> Order {
    Order {
        order_uid: OrderId::from("b563feb7b2b84b6test"),
        track_number: "WBILMTESTTRACK".into(),
        entry: "WBIL".into(),
        delivery: Delivery { name: "Test Testov".into(), city: "Kiryat Mozkin".into(), ..Default::default() },
        payment: Payment { transaction: "b563feb7b2b84b6test".into(), amount: 1817, ..Default::default() },
        items: vec![Item { chrt_id: 9934930, nm_id: 2389212, name: "Mascaras".into(), ..Default::default() }],
        locale: "en".into(),
        sm_id: 99,
        date_created: Utc.with_ymd_and_hms(2021, 11, 26, 6, 22, 19).unwrap(),
        ..Default::default()
    }
}

fn register(cfg: &mut ServiceConfig, db: MockOrderStore) {
    let api = LookupApi::new(db, OrderCache::new());
    cfg.service(health).service(OrderByIdRoute::<MockOrderStore>::new()).app_data(web::Data::new(api));
}

fn configure(cfg: &mut ServiceConfig) {
    let mut db = MockOrderStore::new();
    db.expect_fetch_order().returning(|id| match id.as_str() {
        "b563feb7b2b84b6test" => Ok(Some(stored_order())),
        _ => Ok(None),
    });
    register(cfg, db);
}

fn configure_broken_db(cfg: &mut ServiceConfig) {
    let mut db = MockOrderStore::new();
    db.expect_fetch_order().returning(|_| Err(StorageError::DriverError(sqlx::Error::PoolTimedOut)));
    register(cfg, db);
}

fn configure_no_db(cfg: &mut ServiceConfig) {
    register(cfg, MockOrderStore::new());
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/health", configure_no_db).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn fetch_existing_order() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/order/b563feb7b2b84b6test", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let order: Order = serde_json::from_str(&body).expect("Response is not an order");
    assert_eq!(order, stored_order());
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["payment"]["transaction"], "b563feb7b2b84b6test");
    assert_eq!(json["items"][0]["nm_id"], 2389212);
}

#[actix_web::test]
async fn fetch_unknown_order() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/order/nope", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Order #nope does not exist"}"#);
}

#[actix_web::test]
async fn storage_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/order/b563feb7b2b84b6test", configure_broken_db).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().starts_with("An error occurred on the backend of the server."));
}

#[actix_web::test]
async fn cached_orders_do_not_touch_the_database() {
    let _ = env_logger::try_init().ok();
    // The mock has no expectations and panics on any storage call
    fn configure_cached(cfg: &mut ServiceConfig) {
        let cache = OrderCache::new();
        cache.put(stored_order());
        let api = LookupApi::new(MockOrderStore::new(), cache);
        cfg.service(OrderByIdRoute::<MockOrderStore>::new()).app_data(web::Data::new(api));
    }
    let (status, body) = get_request("/order/b563feb7b2b84b6test", configure_cached).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Order>(&body).unwrap(), stored_order());
}
