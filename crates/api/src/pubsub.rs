//! Startup wiring for Pub/Sub publishers and subscribers.

use std::sync::Arc;

use rbac_events::{log_message, PubSub, Subscriber};
use tokio::task::JoinHandle;

use crate::config::PubSubConfig;

/// Register the configured publisher and spawn the logging subscriber.
///
/// Does nothing unless Pub/Sub is enabled and both a topic and a
/// subscription are configured. Returns the subscriber task, which ends
/// once every handle to `hub` is dropped.
pub fn init(config: &PubSubConfig, hub: &Arc<PubSub>) -> Option<JoinHandle<()>> {
    if !config.enabled {
        tracing::info!("Pub/Sub disabled (ENABLE_PUBSUB not set to true)");
        return None;
    }

    let (Some(topic), Some(subscription)) = (&config.topic, &config.subscription) else {
        tracing::info!(
            "Pub/Sub configuration missing (PUBSUB_TOPIC and PUBSUB_SUBSCRIPTION required), skipping initialization"
        );
        return None;
    };

    hub.add_publisher(topic.as_str());
    tracing::info!(%topic, "Registered publisher");

    let receiver = match hub.subscribe(topic) {
        Ok(receiver) => receiver,
        Err(e) => {
            tracing::error!(error = %e, %topic, "Failed to register subscriber");
            return None;
        }
    };
    tracing::info!(%subscription, "Registered subscriber");

    Some(tokio::spawn(Subscriber::run(
        subscription.clone(),
        receiver,
        log_message,
    )))
}
