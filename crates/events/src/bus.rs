//! Topic-based publish/subscribe hub backed by `tokio::sync::broadcast`.
//!
//! [`PubSub`] is shared via `Arc<PubSub>` across the application. A topic
//! must be registered with [`PubSub::add_publisher`] before anything can be
//! published to or subscribed from it.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PubSubMessage
// ---------------------------------------------------------------------------

/// A message delivered on a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubMessage {
    /// Topic the message was published to.
    pub topic: String,

    /// JSON body supplied by the publisher.
    pub data: serde_json::Value,

    /// Free-form string attributes.
    pub attributes: HashMap<String, String>,

    /// When the hub accepted the message (UTC).
    pub published_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PubSubError {
    #[error("No publisher registered for topic '{0}'")]
    UnknownTopic(String),

    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// PubSub
// ---------------------------------------------------------------------------

/// Default buffer capacity for each topic's broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process topic hub.
///
/// # Usage
///
/// ```rust
/// use rbac_events::PubSub;
///
/// let hub = PubSub::default();
/// hub.add_publisher("user-events");
/// let _rx = hub.subscribe("user-events").unwrap();
///
/// hub.publish("user-events", &serde_json::json!({"hello": "world"})).unwrap();
/// ```
pub struct PubSub {
    capacity: usize,
    topics: RwLock<HashMap<String, broadcast::Sender<PubSubMessage>>>,
}

impl PubSub {
    /// Create a hub whose topics buffer up to `capacity` messages.
    ///
    /// When a topic's buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Register a topic. Registering an existing topic is a no-op.
    pub fn add_publisher(&self, topic: impl Into<String>) {
        let topic = topic.into();
        let mut topics = self.topics.write().unwrap_or_else(PoisonError::into_inner);
        if !topics.contains_key(&topic) {
            let (sender, _) = broadcast::channel(self.capacity);
            tracing::debug!(%topic, "Registered publisher");
            topics.insert(topic, sender);
        }
    }

    /// Whether `topic` has a registered publisher.
    pub fn has_publisher(&self, topic: &str) -> bool {
        self.topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(topic)
    }

    /// Subscribe to every message subsequently published on `topic`.
    pub fn subscribe(
        &self,
        topic: &str,
    ) -> Result<broadcast::Receiver<PubSubMessage>, PubSubError> {
        self.topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
            .map(broadcast::Sender::subscribe)
            .ok_or_else(|| PubSubError::UnknownTopic(topic.to_string()))
    }

    /// Publish `payload` on `topic`, returning the number of subscribers
    /// that will receive it. With no subscribers the message is dropped.
    pub fn publish<T: Serialize>(&self, topic: &str, payload: &T) -> Result<usize, PubSubError> {
        self.publish_with_attributes(topic, payload, HashMap::new())
    }

    /// Publish `payload` on `topic` with message attributes.
    pub fn publish_with_attributes<T: Serialize>(
        &self,
        topic: &str,
        payload: &T,
        attributes: HashMap<String, String>,
    ) -> Result<usize, PubSubError> {
        let data = serde_json::to_value(payload)?;
        let topics = self.topics.read().unwrap_or_else(PoisonError::into_inner);
        let sender = topics
            .get(topic)
            .ok_or_else(|| PubSubError::UnknownTopic(topic.to_string()))?;

        let message = PubSubMessage {
            topic: topic.to_string(),
            data,
            attributes,
            published_at: Utc::now(),
        };

        // A send error only means there are zero receivers.
        Ok(sender.send(message).unwrap_or(0))
    }
}

impl Default for PubSub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
