//! Long-lived subscriber loop.
//!
//! [`Subscriber::run`] drains a topic receiver and hands each message to a
//! handler. Handler failures are logged and never stop the loop; the loop
//! exits once the [`PubSub`](crate::bus::PubSub) hub is dropped.

use std::future::Future;

use tokio::sync::broadcast;

use crate::bus::PubSubMessage;

/// Result returned by a message handler.
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Background consumer for one subscription.
pub struct Subscriber;

impl Subscriber {
    /// Run the subscriber loop for `subscription`.
    pub async fn run<H, Fut>(
        subscription: String,
        mut receiver: broadcast::Receiver<PubSubMessage>,
        handler: H,
    ) where
        H: Fn(PubSubMessage) -> Fut,
        Fut: Future<Output = HandlerResult>,
    {
        tracing::info!(%subscription, "Subscriber started");
        loop {
            match receiver.recv().await {
                Ok(message) => {
                    let topic = message.topic.clone();
                    if let Err(e) = handler(message).await {
                        tracing::error!(
                            error = %e,
                            %subscription,
                            %topic,
                            "Failed to process Pub/Sub message"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        %subscription,
                        "Subscriber lagged, some messages were not processed"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!(%subscription, "Pub/Sub hub closed, subscriber shutting down");
                    break;
                }
            }
        }
    }
}

/// Default handler: log the message and acknowledge it.
pub async fn log_message(message: PubSubMessage) -> HandlerResult {
    tracing::debug!(
        topic = %message.topic,
        attributes = ?message.attributes,
        published_at = %message.published_at,
        "Received Pub/Sub message"
    );
    tracing::info!(data = %message.data, "Pub/Sub message processed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use super::*;
    use crate::bus::PubSub;

    #[tokio::test]
    async fn handler_sees_messages_until_hub_is_dropped() {
        let hub = PubSub::default();
        hub.add_publisher("events");
        let receiver = hub.subscribe("events").unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let task = tokio::spawn(Subscriber::run(
            "events-sub".to_string(),
            receiver,
            move |message: PubSubMessage| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().await.push(message.data);
                    HandlerResult::Ok(())
                }
            },
        ));

        hub.publish("events", &serde_json::json!({"n": 1})).unwrap();
        hub.publish("events", &serde_json::json!({"n": 2})).unwrap();
        drop(hub);

        task.await.expect("subscriber task should finish cleanly");
        let seen = seen.lock().await;
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1]["n"], 2);
    }

    #[tokio::test]
    async fn handler_errors_do_not_stop_the_loop() {
        let hub = PubSub::default();
        hub.add_publisher("events");
        let receiver = hub.subscribe("events").unwrap();

        let count = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&count);
        let task = tokio::spawn(Subscriber::run(
            "events-sub".to_string(),
            receiver,
            move |_message: PubSubMessage| {
                let counter = Arc::clone(&counter);
                async move {
                    *counter.lock().await += 1;
                    HandlerResult::Err("handler failed".into())
                }
            },
        ));

        hub.publish("events", &serde_json::json!(1)).unwrap();
        hub.publish("events", &serde_json::json!(2)).unwrap();
        drop(hub);

        task.await.unwrap();
        assert_eq!(*count.lock().await, 2);
    }

    #[tokio::test]
    async fn log_message_acknowledges() {
        let message = PubSubMessage {
            topic: "events".to_string(),
            data: serde_json::json!({"message": "hi"}),
            attributes: Default::default(),
            published_at: chrono::Utc::now(),
        };
        assert!(log_message(message).await.is_ok());
    }
}
