//! Order Engine
//!
//! The order engine is the ingestion, persistence and caching core of the order service. It turns order messages from
//! a durable queue into committed database rows and cache entries, and serves single orders back out of the cache.
//!
//! The library is divided into these sections:
//! 1. Database management ([`mod@db`]). SQLite is the supported backend. Every order is spread across four tables
//!    (orders, deliveries, payments and items) and always written or read as a whole, inside one transaction. Callers
//!    use the [`OrderStorage`] trait rather than the tables directly. The data types are public, in [`db_types`].
//! 2. The process-wide [`OrderCache`].
//! 3. The order API ([`mod@order_api`]): a write-through [`PersistenceApi`], a read-through [`LookupApi`] and a
//!    startup [`HydrationApi`].
//! 4. Ingestion ([`mod@ingest`]). The [`IngestLoop`] drives messages from any [`OrderMessageSource`] through the
//!    persistence API, and commits each message only once its order is stored.
//!
//! The engine also emits events as messages are committed or skipped. Use [`events::EventHooks`] to subscribe to them.
mod db;

pub mod cache;
pub mod db_types;
pub mod events;
pub mod ingest;
pub mod order_api;
pub mod traits;

pub use cache::OrderCache;
#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use ingest::{IngestLoop, IngestSummary, OrderMessageSource};
pub use order_api::{
    errors::{DecodeError, HydrationError, LookupError},
    hydration_api::HydrationApi,
    lookup_api::LookupApi,
    persistence_api::PersistenceApi,
};
pub use traits::{OrderStorage, PersistenceError, StorageError};
