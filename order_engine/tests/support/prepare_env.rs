use std::time::Duration;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use order_engine::SqliteDatabase;

/// Loads `.env.test`, initialises logging and creates a freshly migrated, empty database at `url`.
pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

pub fn random_db_path() -> String {
    let path = std::env::temp_dir().join(format!("order_store_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

/// Opens a database at `url` with a small pool, suitable for tests.
pub async fn test_database(url: &str) -> SqliteDatabase {
    SqliteDatabase::new_with_url(url, 5, Duration::from_secs(5)).await.expect("Error creating connection to database")
}

pub async fn run_migrations(url: &str) {
    let db = test_database(url).await;
    db.run_migrations().await.expect("Error running DB migrations");
    db.close().await;
    info!("🚀️ Migrations complete");
}

pub async fn create_database(url: &str) {
    if Sqlite::database_exists(url).await.unwrap_or(false) {
        if let Err(e) = Sqlite::drop_database(url).await {
            warn!("Error dropping database {url}: {e:?}");
        }
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

/// Deletes the database at `url`, along with its WAL files.
pub async fn drop_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
}
