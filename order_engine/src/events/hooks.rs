use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, MessageSkippedEvent, OrderCommittedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_committed_producer: Vec<EventProducer<OrderCommittedEvent>>,
    pub message_skipped_producer: Vec<EventProducer<MessageSkippedEvent>>,
}

pub struct EventHandlers {
    pub on_order_committed: Option<EventHandler<OrderCommittedEvent>>,
    pub on_message_skipped: Option<EventHandler<MessageSkippedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_committed = hooks.on_order_committed.map(|f| EventHandler::new(buffer_size, f));
        let on_message_skipped = hooks.on_message_skipped.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_committed, on_message_skipped }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_committed {
            result.order_committed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_message_skipped {
            result.message_skipped_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_order_committed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_message_skipped {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_committed: Option<Handler<OrderCommittedEvent>>,
    pub on_message_skipped: Option<Handler<MessageSkippedEvent>>,
}

impl EventHooks {
    pub fn on_order_committed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderCommittedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_committed = Some(Arc::new(f));
        self
    }

    pub fn on_message_skipped<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(MessageSkippedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_message_skipped = Some(Arc::new(f));
        self
    }
}
