use crate::domain_model::EventEnvelope;
use crate::domain_port::EventSink;
use std::sync::Mutex;

/// Keeps every emitted envelope in order.
#[derive(Default)]
pub struct MemoryEventSink {
    recorded: Mutex<Vec<EventEnvelope>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<EventEnvelope> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl EventSink for MemoryEventSink {
    async fn emit(&self, envelope: EventEnvelope) {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(envelope);
    }
}
