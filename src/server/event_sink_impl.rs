use crate::domain_model::EventEnvelope;
use crate::domain_port::EventSink;
use crate::logger::*;
use crate::server::EventPublisher;
use std::sync::Arc;

/// Writes every event to the log. Used when no broker is configured.
pub struct TracingEventSink;

#[async_trait::async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, envelope: EventEnvelope) {
        info!(
            event = envelope.body.name(),
            receivers = ?envelope.receivers,
            "domain event"
        );
    }
}

/// Publishes events to a broker topic, keyed by the first receiver so one
/// user's events stay ordered within a partition.
pub struct PublishingEventSink {
    publisher: Arc<dyn EventPublisher>,
    topic: String,
}

impl PublishingEventSink {
    pub fn new(publisher: Arc<dyn EventPublisher>, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
        }
    }
}

#[async_trait::async_trait]
impl EventSink for PublishingEventSink {
    async fn emit(&self, envelope: EventEnvelope) {
        let payload = match serde_json::to_vec(&envelope) {
            Ok(payload) => payload,
            Err(e) => {
                error!(event = envelope.body.name(), "serialize event: {e}");
                return;
            }
        };
        let key = envelope
            .receivers
            .first()
            .map(|u| u.0.as_bytes().to_vec())
            .unwrap_or_default();

        let publisher = self.publisher.clone();
        let topic = self.topic.clone();
        let name = envelope.body.name();
        tokio::spawn(async move {
            if let Err(e) = publisher.publish(&topic, &key, &payload).await {
                error!(event = name, %topic, "publish event: {e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::*;
    use tokio::sync::mpsc;

    struct ChannelPublisher(mpsc::UnboundedSender<(String, Vec<u8>, Vec<u8>)>);

    #[async_trait::async_trait]
    impl EventPublisher for ChannelPublisher {
        async fn publish(&self, topic: &str, key: &[u8], payload: &[u8]) -> anyhow::Result<()> {
            self.0
                .send((topic.to_string(), key.to_vec(), payload.to_vec()))?;
            Ok(())
        }
    }

    struct FailingPublisher;

    #[async_trait::async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, _: &str, _: &[u8], _: &[u8]) -> anyhow::Result<()> {
            anyhow::bail!("broker unavailable")
        }
    }

    fn removed(a: UserId, b: UserId) -> EventEnvelope {
        EventEnvelope::new(
            vec![a, b],
            DomainEvent::ConnectionRemoved(UserPairEvent {
                from_user: a,
                to_user: b,
            }),
        )
    }

    #[tokio::test]
    async fn publishes_json_keyed_by_first_receiver() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = PublishingEventSink::new(Arc::new(ChannelPublisher(tx)), "relation.event");
        let (a, b) = (UserId::new_random(), UserId::new_random());

        sink.emit(removed(a, b)).await;

        let (topic, key, payload) = rx.recv().await.unwrap();
        assert_eq!(topic, "relation.event");
        assert_eq!(key, a.0.as_bytes().to_vec());
        let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(json["body"]["type"], "connection.removed");
        let back: EventEnvelope = serde_json::from_slice(&payload).unwrap();
        assert_eq!(back, removed(a, b));
    }

    #[tokio::test]
    async fn publish_failure_is_swallowed() {
        let sink = PublishingEventSink::new(Arc::new(FailingPublisher), "relation.event");
        let (a, b) = (UserId::new_random(), UserId::new_random());

        sink.emit(removed(a, b)).await;
        tokio::task::yield_now().await;
    }
}
