use log::*;
use order_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    IngestLoop,
    IngestSummary,
    PersistenceApi,
    SqliteDatabase,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::queue::JetStreamSource;

pub const INGEST_EVENT_BUFFER_SIZE: usize = 64;

/// Starts the ingestion worker. It runs until the queue closes or `shutdown` is cancelled, and then resolves to a
/// summary of what it did.
pub fn start_ingest_worker(
    source: JetStreamSource,
    api: PersistenceApi<SqliteDatabase>,
    producers: EventProducers,
    shutdown: CancellationToken,
) -> JoinHandle<IngestSummary> {
    tokio::spawn(async move {
        info!("📥️ Ingestion worker started");
        IngestLoop::new(source, api, shutdown).with_producers(producers).run().await
    })
}

/// Hooks that the server attaches to the ingestion loop.
///
/// Skipped messages are logged under the `orders::skipped` target so that they can be routed to their own sink.
pub fn create_ingest_event_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks
        .on_order_committed(|ev| {
            trace!("📥️ Order [{}] committed at {}", ev.order_uid, ev.position);
            Box::pin(async {})
        })
        .on_message_skipped(|ev| {
            let order = ev.order_uid.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "unknown".into());
            warn!(
                target: "orders::skipped",
                "📥️ Skipped message at {} (order: {order}, reason: {}). {}",
                ev.position, ev.reason, ev.detail
            );
            Box::pin(async {})
        });
    EventHandlers::new(INGEST_EVENT_BUFFER_SIZE, hooks)
}
