use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::db_types::OrderId;

/// Emitted after an order has been persisted, cached, and its queue message committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCommittedEvent {
    pub order_uid: OrderId,
    /// A description of the queue position that was committed, e.g. a stream sequence number.
    pub position: String,
}

impl OrderCommittedEvent {
    pub fn new(order_uid: OrderId, position: String) -> Self {
        Self { order_uid, position }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The payload could not be decoded into an order.
    Decode,
    /// The order could not be written to the database.
    Persistence,
    /// The order was written, but the queue position could not be committed. The message will be redelivered.
    Commit,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Decode => write!(f, "decode"),
            SkipReason::Persistence => write!(f, "persistence"),
            SkipReason::Commit => write!(f, "commit"),
        }
    }
}

/// Emitted whenever a queue message is left uncommitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSkippedEvent {
    pub position: String,
    /// The order id, if the payload got far enough to be decoded.
    pub order_uid: Option<OrderId>,
    pub reason: SkipReason,
    pub detail: String,
}

impl MessageSkippedEvent {
    pub fn new(position: String, order_uid: Option<OrderId>, reason: SkipReason, detail: String) -> Self {
        Self { position, order_uid, reason, detail }
    }
}
