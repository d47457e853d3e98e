//! The public API of the order engine.
//!
//! * [`persistence_api::PersistenceApi`] writes orders through to the database and then to the cache.
//! * [`lookup_api::LookupApi`] serves single orders from the cache, reading through to the database on a miss.
//! * [`hydration_api::HydrationApi`] rebuilds the cache from the database at startup.
pub mod errors;
pub mod hydration_api;
pub mod lookup_api;
pub mod persistence_api;

use std::time::Duration;

/// The default deadline for a single storage operation.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);
/// The default deadline for reading the whole database during cache hydration.
pub const DEFAULT_HYDRATION_TIMEOUT: Duration = Duration::from_secs(60);
