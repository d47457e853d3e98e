use order_engine::{HydrationApi, LookupApi, OrderCache, PersistenceApi, SqliteDatabase};
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

#[tokio::test]
async fn hydration_restores_every_order_in_full() {
    let db = setup().await;
    let writer = PersistenceApi::new(db.clone(), OrderCache::new());
    let mut expected = Vec::new();
    for i in 0..25 {
        let mut order = full_order(&format!("h{i}"));
        order.items = (0..(i % 4)).map(item).collect();
        writer.save(order.clone()).await.unwrap();
        expected.push(order);
    }

    // A fresh cache stands in for a restarted process
    let cache = OrderCache::new();
    let loaded = HydrationApi::new(db.clone(), cache.clone()).hydrate_all().await.expect("hydration failed");
    assert_eq!(loaded, 25);
    assert_eq!(cache.len(), 25);
    for order in &expected {
        let cached = cache.get(&order.order_uid).expect("order missing from cache");
        assert_eq!(*cached, *order);
    }

    // Lookups after hydration never need the database
    let url = db.url().to_string();
    db.close().await;
    let lookup = LookupApi::new(db, cache);
    let hit = lookup.lookup(&"h3".into()).await.unwrap().unwrap();
    assert_eq!(hit.items.len(), 3);
    drop_database(&url).await;
}

#[tokio::test]
async fn empty_database_hydrates_nothing() {
    let db = setup().await;
    let cache = OrderCache::new();
    assert_eq!(HydrationApi::new(db.clone(), cache.clone()).hydrate_all().await.unwrap(), 0);
    assert!(cache.is_empty());
    let url = db.url().to_string();
    db.close().await;
    drop_database(&url).await;
}

#[tokio::test]
async fn hydration_fails_when_the_database_is_unavailable() {
    let db = setup().await;
    let url = db.url().to_string();
    db.close().await;
    let cache = OrderCache::new();
    assert!(HydrationApi::new(db, cache.clone()).hydrate_all().await.is_err());
    assert!(cache.is_empty());
    drop_database(&url).await;
}
