use crate::domain_model::EventEnvelope;

/// Fire-and-forget notification boundary. Delivery failures stay inside the
/// sink; callers never observe them.
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, envelope: EventEnvelope);
}
