//! # Storage gateway contracts
//!
//! This module defines the interface that a database backend must expose in order to back the order service.
//!
//! * [`OrderStorage`] persists a complete order atomically, reads a single order back in full, and reads every stored
//!   order in full for cache hydration.
//!
//! "Not found" is always reported as `Ok(None)`. Errors are reserved for genuine storage failures.
mod order_storage;

pub use order_storage::{OrderStorage, PersistenceError, StorageError};

#[cfg(test)]
pub(crate) mod mocks;
