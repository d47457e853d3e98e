//! # Ingestion
//!
//! The ingestion loop pulls order messages from a queue, decodes them, writes them through the
//! [`PersistenceApi`](crate::order_api::persistence_api::PersistenceApi) and only then commits the message's queue
//! position. Anything that goes wrong before the commit leaves the message uncommitted so that the queue can deliver it
//! again.
//!
//! The queue itself is abstracted behind [`OrderMessageSource`]. [`ChannelSource`] is an in-process implementation
//! backed by a tokio channel. The server crate provides one for NATS JetStream.
mod channel_source;
mod decode;
mod ingest_loop;
mod source;

pub use channel_source::{channel_source, ChannelFeeder, ChannelMessage, ChannelSource};
pub use decode::decode_order;
pub use ingest_loop::{IngestLoop, IngestSummary, DEFAULT_RECEIVE_BACKOFF};
pub use source::{InboundMessage, OrderMessageSource, SourceError};
