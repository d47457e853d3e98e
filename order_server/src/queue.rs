//! NATS JetStream order queue
//!
//! Order documents are published on a subject that is captured by a JetStream stream. The server reads them through
//! a durable pull consumer with explicit acknowledgements. Acknowledging a message is what commits the consumer's read
//! position. A message that is not acknowledged within the consumer's `ack_wait` is delivered again, up to
//! `max_deliver` times. Acks wait for the server's confirmation, so a commit only succeeds once the broker has
//! recorded it.
use async_nats::jetstream::{
    self,
    consumer::{pull, AckPolicy, DeliverPolicy},
    stream,
};
use futures::StreamExt;
use log::*;
use order_engine::ingest::{InboundMessage, OrderMessageSource, SourceError};

use crate::{config::QueueConfig, errors::ServerError};

pub struct JetStreamSource {
    messages: pull::Stream,
    stream: String,
}

pub struct JetStreamMessage {
    inner: jetstream::Message,
    position: String,
}

impl JetStreamMessage {
    fn new(inner: jetstream::Message) -> Self {
        let position = match inner.info() {
            Ok(info) => {
                if info.delivered > 1 {
                    debug!(
                        "📨️ {} seq {} is being redelivered (attempt {})",
                        info.stream, info.stream_sequence, info.delivered
                    );
                }
                format!("{} seq {}", info.stream, info.stream_sequence)
            },
            Err(e) => {
                warn!("📨️ Message on {} has no JetStream metadata. {e}", inner.subject);
                format!("{} (unknown sequence)", inner.subject)
            },
        };
        Self { inner, position }
    }
}

impl InboundMessage for JetStreamMessage {
    fn payload(&self) -> &[u8] {
        &self.inner.payload
    }

    fn position(&self) -> String {
        self.position.clone()
    }
}

impl JetStreamSource {
    /// Connects to NATS, creates the stream and the durable consumer if they do not exist yet, and starts pulling
    /// messages.
    pub async fn connect(config: &QueueConfig) -> Result<Self, ServerError> {
        info!("📨️ Connecting to NATS at {}", config.nats_url);
        let client = async_nats::connect(config.nats_url.as_str())
            .await
            .map_err(|e| ServerError::QueueError(format!("Could not connect to {}. {e}", config.nats_url)))?;
        let js = jetstream::new(client);
        let stream = js
            .get_or_create_stream(stream::Config {
                name: config.stream.clone(),
                subjects: vec![config.subject.clone()],
                ..Default::default()
            })
            .await
            .map_err(|e| ServerError::QueueError(format!("Could not open stream {}. {e}", config.stream)))?;
        let consumer = stream
            .get_or_create_consumer(&config.consumer_group, pull::Config {
                durable_name: Some(config.consumer_group.clone()),
                deliver_policy: DeliverPolicy::All,
                ack_policy: AckPolicy::Explicit,
                ack_wait: config.ack_wait,
                max_deliver: config.max_deliver,
                max_ack_pending: config.max_ack_pending,
                ..Default::default()
            })
            .await
            .map_err(|e| {
                ServerError::QueueError(format!("Could not create consumer {}. {e}", config.consumer_group))
            })?;
        let messages = consumer
            .messages()
            .await
            .map_err(|e| ServerError::QueueError(format!("Could not start pulling messages. {e}")))?;
        info!(
            "📨️ Consuming {} from stream {} as {} (max deliver {}, max ack pending {})",
            config.subject, config.stream, config.consumer_group, config.max_deliver, config.max_ack_pending
        );
        Ok(Self { messages, stream: config.stream.clone() })
    }
}

impl OrderMessageSource for JetStreamSource {
    type Message = JetStreamMessage;

    async fn receive(&mut self) -> Result<Option<Self::Message>, SourceError> {
        match self.messages.next().await {
            Some(Ok(msg)) => Ok(Some(JetStreamMessage::new(msg))),
            Some(Err(e)) => Err(SourceError::ReceiveFailed(format!("{}: {e}", self.stream))),
            None => {
                info!("📨️ Message stream for {} has ended", self.stream);
                Ok(None)
            },
        }
    }

    async fn commit(&mut self, message: &Self::Message) -> Result<(), SourceError> {
        message
            .inner
            .double_ack()
            .await
            .map_err(|e| SourceError::CommitFailed { position: message.position(), reason: e.to_string() })
    }
}
