use std::time::Duration;

use thiserror::Error;

use crate::traits::StorageError;

/// A failure reading an order for the lookup service. "Not found" is not an error, and is reported as `Ok(None)`.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Storage error while reading the order. {0}")]
    StorageError(#[from] StorageError),
    #[error("The order could not be read within {0:?}")]
    TimedOut(Duration),
}

/// A failure rebuilding the cache at startup. The service must not start serving after one of these.
#[derive(Debug, Error)]
pub enum HydrationError {
    #[error("Storage error while hydrating the cache. {0}")]
    StorageError(#[from] StorageError),
    #[error("The cache could not be hydrated within {0:?}")]
    TimedOut(Duration),
}

/// A queue payload that cannot be turned into an order.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Payload is not a valid order document. {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Payload has no order_uid")]
    MissingOrderUid,
}
