//! An in-process [`OrderMessageSource`] backed by a tokio channel.
//!
//! Each message is given the next sequential offset when it is received. The offsets that are committed are recorded
//! and can be inspected through the [`ChannelFeeder`]. Nothing is ever redelivered; a redelivery is simulated by
//! publishing the same payload again. Receive and commit failures can be injected from the feeder.
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
    Mutex,
};

use log::*;
use tokio::sync::mpsc;

use crate::ingest::{InboundMessage, OrderMessageSource, SourceError};

#[derive(Debug, Clone)]
pub struct ChannelMessage {
    offset: u64,
    payload: Vec<u8>,
}

impl ChannelMessage {
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl InboundMessage for ChannelMessage {
    fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn position(&self) -> String {
        format!("offset {}", self.offset)
    }
}

#[derive(Debug, Default)]
struct SourceState {
    offsets: Mutex<Vec<u64>>,
    reject: AtomicBool,
    failing_receives: AtomicU64,
}

impl SourceState {
    fn offsets(&self) -> Vec<u64> {
        self.offsets.lock().map(|o| o.clone()).unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Uses up one injected receive failure, if any are left.
    fn take_receive_failure(&self) -> bool {
        self.failing_receives.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok()
    }
}

pub struct ChannelSource {
    receiver: mpsc::Receiver<Vec<u8>>,
    next_offset: u64,
    state: Arc<SourceState>,
}

/// The producer half of a [`ChannelSource`]. Dropping every feeder closes the source.
#[derive(Clone)]
pub struct ChannelFeeder {
    sender: mpsc::Sender<Vec<u8>>,
    state: Arc<SourceState>,
}

/// Creates a connected feeder and source pair. `buffer` is the number of messages that can be queued before
/// [`ChannelFeeder::publish`] waits.
pub fn channel_source(buffer: usize) -> (ChannelFeeder, ChannelSource) {
    let (sender, receiver) = mpsc::channel(buffer);
    let state = Arc::new(SourceState::default());
    let feeder = ChannelFeeder { sender, state: Arc::clone(&state) };
    let source = ChannelSource { receiver, next_offset: 0, state };
    (feeder, source)
}

impl ChannelFeeder {
    pub async fn publish<P: Into<Vec<u8>>>(&self, payload: P) -> Result<(), SourceError> {
        self.sender.send(payload.into()).await.map_err(|e| SourceError::ReceiveFailed(e.to_string()))
    }

    /// The offsets that have been committed so far, in commit order.
    pub fn committed_offsets(&self) -> Vec<u64> {
        self.state.offsets()
    }

    /// While set, every commit attempt fails.
    pub fn reject_commits(&self, reject: bool) {
        self.state.reject.store(reject, Ordering::SeqCst);
    }

    /// Makes the next `count` receive calls fail without consuming a message.
    pub fn fail_next_receives(&self, count: u64) {
        self.state.failing_receives.store(count, Ordering::SeqCst);
    }
}

impl OrderMessageSource for ChannelSource {
    type Message = ChannelMessage;

    async fn receive(&mut self) -> Result<Option<Self::Message>, SourceError> {
        if self.state.take_receive_failure() {
            let reason = format!("channel source at offset {} is unavailable", self.next_offset);
            return Err(SourceError::ReceiveFailed(reason));
        }
        let Some(payload) = self.receiver.recv().await else {
            debug!("📨️ Channel source is closed");
            return Ok(None);
        };
        let offset = self.next_offset;
        self.next_offset += 1;
        Ok(Some(ChannelMessage { offset, payload }))
    }

    async fn commit(&mut self, message: &Self::Message) -> Result<(), SourceError> {
        if self.state.reject.load(Ordering::SeqCst) {
            return Err(SourceError::CommitFailed {
                position: message.position(),
                reason: "commits are being rejected".into(),
            });
        }
        let mut offsets = self.state.offsets.lock().map_err(|e| SourceError::CommitFailed {
            position: message.position(),
            reason: e.to_string(),
        })?;
        offsets.push(message.offset);
        Ok(())
    }
}
