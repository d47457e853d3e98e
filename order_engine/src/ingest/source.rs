use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Could not receive a message from the queue. {0}")]
    ReceiveFailed(String),
    #[error("Could not commit the queue position of message {position}. {reason}")]
    CommitFailed { position: String, reason: String },
}

/// A single message pulled from an order queue.
pub trait InboundMessage {
    /// The raw message body, expected to be an order JSON document.
    fn payload(&self) -> &[u8];
    /// A human-readable description of the message's position in the queue, used in logs and events.
    fn position(&self) -> String;
}

/// A durable, at-least-once queue of order messages.
///
/// Messages that are received but never committed must eventually be delivered again. Committing a message records
/// the consumer's durable read position past it.
#[allow(async_fn_in_trait)]
pub trait OrderMessageSource {
    type Message: InboundMessage;

    /// Waits for the next message. `Ok(None)` means the source has been closed and no further messages will arrive.
    async fn receive(&mut self) -> Result<Option<Self::Message>, SourceError>;

    async fn commit(&mut self, message: &Self::Message) -> Result<(), SourceError>;
}
