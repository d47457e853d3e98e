use log::*;
use order_engine::{
    db_types::OrderId,
    LookupApi,
    OrderCache,
    OrderStorage,
    PersistenceApi,
    PersistenceError,
    SqliteDatabase,
};
use support::{
    orders::{full_order, item},
    prepare_env::{drop_database, prepare_test_env, random_db_path, test_database},
};

mod support;

async fn setup() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    test_database(&url).await
}

async fn tear_down(db: SqliteDatabase) {
    let url = db.url().to_string();
    db.close().await;
    drop_database(&url).await;
}

async fn count_rows(db: &SqliteDatabase, table: &str, id: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE order_uid = $1"))
        .bind(id)
        .fetch_one(db.pool())
        .await
        .expect("count query failed")
}

#[tokio::test]
async fn redelivered_order_is_stored_once() {
    let db = setup().await;
    let api = PersistenceApi::new(db.clone(), OrderCache::new());
    let order = full_order("dup1");
    for _ in 0..3 {
        api.save(order.clone()).await.expect("save failed");
    }
    assert_eq!(count_rows(&db, "orders", "dup1").await, 1);
    assert_eq!(count_rows(&db, "deliveries", "dup1").await, 1);
    assert_eq!(count_rows(&db, "payments", "dup1").await, 1);
    assert_eq!(count_rows(&db, "items", "dup1").await, 1);
    let stored = db.fetch_order(&"dup1".into()).await.unwrap().expect("order should be stored");
    assert_eq!(stored, order);
    assert_eq!(*api.cache().get(&"dup1".into()).unwrap(), order);
    tear_down(db).await;
}

#[tokio::test]
async fn newer_version_replaces_items() {
    let db = setup().await;
    let api = PersistenceApi::new(db.clone(), OrderCache::new());
    let mut order = full_order("o1");
    order.items = vec![item(1), item(2)];
    api.save(order.clone()).await.unwrap();
    order.items = vec![item(1)];
    order.delivery.city = "Omsk".into();
    api.save(order.clone()).await.unwrap();

    let stored = db.fetch_order(&"o1".into()).await.unwrap().unwrap();
    assert_eq!(stored.items, vec![item(1)]);
    assert_eq!(stored.delivery.city, "Omsk");
    assert_eq!(api.cache().get(&"o1".into()).unwrap().items, vec![item(1)]);
    assert_eq!(count_rows(&db, "items", "o1").await, 1);
    tear_down(db).await;
}

#[tokio::test]
async fn item_order_is_preserved() {
    let db = setup().await;
    let api = PersistenceApi::new(db.clone(), OrderCache::new());
    let mut order = full_order("many");
    order.items = (0..10).rev().map(item).collect();
    api.save(order.clone()).await.unwrap();
    let stored = db.fetch_order(&"many".into()).await.unwrap().unwrap();
    let ids = stored.items.iter().map(|i| i.nm_id).collect::<Vec<_>>();
    assert_eq!(ids, vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
    tear_down(db).await;
}

#[tokio::test]
async fn failed_item_insert_writes_nothing() {
    let db = setup().await;
    sqlx::query(
        r#"CREATE TRIGGER poison_items BEFORE INSERT ON items WHEN NEW.name = 'poison'
           BEGIN SELECT RAISE(ABORT, 'poisoned item'); END;"#,
    )
    .execute(db.pool())
    .await
    .expect("could not create trigger");
    let api = PersistenceApi::new(db.clone(), OrderCache::new());

    let mut order = full_order("p1");
    order.items = vec![item(1), item(2)];
    order.items[1].name = "poison".into();
    let err = api.save(order).await.expect_err("save should fail");
    info!("🚀️ Save failed as expected: {err}");
    assert!(matches!(err, PersistenceError::ItemInsertFailed(_)));
    for table in ["orders", "deliveries", "payments", "items"] {
        assert_eq!(count_rows(&db, table, "p1").await, 0, "{table} has rows for a failed order");
    }
    assert!(api.cache().get(&"p1".into()).is_none());

    // A failed rewrite leaves the previous version untouched
    let good = full_order("p2");
    api.save(good.clone()).await.unwrap();
    let mut bad = full_order("p2");
    bad.delivery.city = "Nowhere".into();
    bad.items[0].name = "poison".into();
    assert!(api.save(bad).await.is_err());
    assert_eq!(db.fetch_order(&"p2".into()).await.unwrap().unwrap(), good);
    assert_eq!(*api.cache().get(&"p2".into()).unwrap(), good);
    tear_down(db).await;
}

#[tokio::test]
async fn cold_cache_lookup_reads_from_the_database() {
    let db = setup().await;
    let writer = PersistenceApi::new(db.clone(), OrderCache::new());
    writer.save(full_order("cold")).await.unwrap();

    let cache = OrderCache::new();
    let lookup = LookupApi::new(db.clone(), cache.clone());
    assert!(cache.is_empty());
    let order = lookup.lookup(&"cold".into()).await.unwrap().expect("order should be found");
    assert_eq!(*order, full_order("cold"));
    assert_eq!(*cache.get(&"cold".into()).unwrap(), full_order("cold"));
    tear_down(db).await;
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let db = setup().await;
    let lookup = LookupApi::new(db.clone(), OrderCache::new());
    let id = OrderId::from("does-not-exist");
    assert!(lookup.lookup(&id).await.unwrap().is_none());
    assert!(db.fetch_order(&id).await.unwrap().is_none());
    assert!(lookup.cache().is_empty());
    tear_down(db).await;
}

#[tokio::test]
async fn sparse_order_round_trips() {
    let db = setup().await;
    let api = PersistenceApi::new(db.clone(), OrderCache::new());
    let order = order_engine::ingest::decode_order(br#"{"order_uid":"sparse"}"#).unwrap();
    api.save(order.clone()).await.unwrap();
    let stored = db.fetch_order(&"sparse".into()).await.unwrap().unwrap();
    assert_eq!(stored, order);
    assert!(stored.items.is_empty());
    tear_down(db).await;
}
