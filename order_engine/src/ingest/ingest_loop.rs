use std::time::Duration;

use log::*;
use tokio_util::sync::CancellationToken;

use crate::{
    db_types::OrderId,
    events::{EventProducers, MessageSkippedEvent, OrderCommittedEvent, SkipReason},
    ingest::{decode_order, InboundMessage, OrderMessageSource},
    order_api::persistence_api::PersistenceApi,
    traits::OrderStorage,
};

/// How long the loop waits after a failed receive before asking the source again.
pub const DEFAULT_RECEIVE_BACKOFF: Duration = Duration::from_secs(1);

/// Counters describing what the ingestion loop did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub received: u64,
    pub committed: u64,
    /// Messages left uncommitted because they could not be decoded or persisted.
    pub skipped: u64,
    /// Messages that were persisted but whose queue position could not be committed.
    pub commit_failures: u64,
    pub receive_errors: u64,
}

/// The consumer side of the order pipeline.
///
/// For every message: decode, persist (database, then cache), then commit the queue position. A message is only
/// committed after its order has been durably written, so any failure before that point results in redelivery.
pub struct IngestLoop<S, B> {
    source: S,
    api: PersistenceApi<B>,
    producers: EventProducers,
    shutdown: CancellationToken,
    receive_backoff: Duration,
}

impl<S, B> IngestLoop<S, B>
where
    S: OrderMessageSource,
    B: OrderStorage,
{
    pub fn new(source: S, api: PersistenceApi<B>, shutdown: CancellationToken) -> Self {
        Self { source, api, producers: EventProducers::default(), shutdown, receive_backoff: DEFAULT_RECEIVE_BACKOFF }
    }

    pub fn with_producers(mut self, producers: EventProducers) -> Self {
        self.producers = producers;
        self
    }

    /// Sets the pause after a failed receive.
    pub fn with_receive_backoff(mut self, backoff: Duration) -> Self {
        self.receive_backoff = backoff;
        self
    }

    /// Runs until the source closes or the shutdown token is cancelled.
    ///
    /// Cancellation is only checked while waiting for a message. Once a message has been received it is always taken
    /// through to a commit or a skip before the loop looks at the token again.
    pub async fn run(mut self) -> IngestSummary {
        info!("📥️ Order ingestion loop started");
        let mut summary = IngestSummary::default();
        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("📥️ Shutdown requested. Stopping the ingestion loop.");
                    break;
                },
                next = self.source.receive() => next,
            };
            match next {
                Ok(Some(message)) => self.process(message, &mut summary).await,
                Ok(None) => {
                    info!("📥️ The order queue has closed. Stopping the ingestion loop.");
                    break;
                },
                Err(e) => {
                    summary.receive_errors += 1;
                    warn!("📥️ {e}. Retrying in {:?}", self.receive_backoff);
                    tokio::select! {
                        _ = self.shutdown.cancelled() => {
                            info!("📥️ Shutdown requested. Stopping the ingestion loop.");
                            break;
                        },
                        _ = tokio::time::sleep(self.receive_backoff) => {},
                    }
                },
            }
        }
        info!(
            "📥️ Ingestion loop stopped. {} received, {} committed, {} skipped, {} commit failures, {} receive errors",
            summary.received, summary.committed, summary.skipped, summary.commit_failures, summary.receive_errors
        );
        summary
    }

    async fn process(&mut self, message: S::Message, summary: &mut IngestSummary) {
        summary.received += 1;
        let position = message.position();
        let order = match decode_order(message.payload()) {
            Ok(order) => order,
            Err(e) => {
                warn!("📥️ Message at {position} is not a valid order and will not be committed. {e}");
                summary.skipped += 1;
                self.notify_skipped(MessageSkippedEvent::new(position, None, SkipReason::Decode, e.to_string())).await;
                return;
            },
        };
        let order_uid = order.order_uid.clone();
        trace!("📥️ Decoded order [{order_uid}] from {position}");
        if let Err(e) = self.api.save(order).await {
            warn!("📥️ Order [{order_uid}] from {position} could not be persisted and will not be committed. {e}");
            summary.skipped += 1;
            let ev = MessageSkippedEvent::new(position, Some(order_uid), SkipReason::Persistence, e.to_string());
            self.notify_skipped(ev).await;
            return;
        }
        match self.source.commit(&message).await {
            Ok(()) => {
                summary.committed += 1;
                debug!("📥️ Order [{order_uid}] ingested and {position} committed");
                self.notify_committed(order_uid, position).await;
            },
            Err(e) => {
                // The order is stored. A redelivery will simply write it again.
                error!("📥️ Order [{order_uid}] was persisted but its queue position was not committed. {e}");
                summary.commit_failures += 1;
                let ev = MessageSkippedEvent::new(position, Some(order_uid), SkipReason::Commit, e.to_string());
                self.notify_skipped(ev).await;
            },
        }
    }

    async fn notify_committed(&self, order_uid: OrderId, position: String) {
        for emitter in &self.producers.order_committed_producer {
            trace!("📥️ Notifying order committed hook subscribers");
            emitter.publish_event(OrderCommittedEvent::new(order_uid.clone(), position.clone())).await;
        }
    }

    async fn notify_skipped(&self, event: MessageSkippedEvent) {
        for emitter in &self.producers.message_skipped_producer {
            trace!("📥️ Notifying message skipped hook subscribers");
            emitter.publish_event(event.clone()).await;
        }
    }
}
