use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use order_engine::{HydrationApi, LookupApi, OrderCache, PersistenceApi, SqliteDatabase};
use tokio_util::sync::CancellationToken;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    ingest_worker::{create_ingest_event_handlers, start_ingest_worker},
    queue::JetStreamSource,
    routes::{health, OrderByIdRoute},
};

/// Brings the service up in order: database, schema, cache hydration, queue, ingestion worker and finally the HTTP
/// server. Any failure before the HTTP server starts is fatal.
///
/// When the HTTP server stops, the ingestion worker is asked to stop and awaited before returning.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.db_max_connections, config.storage_timeout)
        .await
        .map_err(|e| ServerError::InitializeError(format!("Could not open {}. {e}", config.database_url)))?;
    db.run_migrations().await?;

    let cache = OrderCache::new();
    let hydrated = HydrationApi::new(db.clone(), cache.clone())
        .with_timeout(config.hydration_timeout)
        .hydrate_all()
        .await?;
    info!("🚀️ {hydrated} orders loaded into the cache");

    let source = JetStreamSource::connect(&config.queue).await?;
    let handlers = create_ingest_event_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let shutdown = CancellationToken::new();
    let persistence_api = PersistenceApi::new(db.clone(), cache.clone()).with_timeout(config.storage_timeout);
    let worker = start_ingest_worker(source, persistence_api, producers, shutdown.clone());

    let srv = create_server_instance(config, db.clone(), cache)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));

    info!("🚀️ HTTP server has stopped. Waiting for the ingestion worker to finish.");
    shutdown.cancel();
    match worker.await {
        Ok(summary) => info!("🚀️ Ingestion worker finished. {summary:?}"),
        Err(e) => error!("🚀️ Ingestion worker did not shut down cleanly. {e}"),
    }
    db.close().await;
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    cache: OrderCache,
) -> Result<Server, ServerError> {
    let storage_timeout = config.storage_timeout;
    let srv = HttpServer::new(move || {
        let lookup_api = LookupApi::new(db.clone(), cache.clone()).with_timeout(storage_timeout);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("orders::access_log"))
            .app_data(web::Data::new(lookup_api))
            .service(health)
            .service(OrderByIdRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
