//! In-process Pub/Sub for the RBAC service.
//!
//! - [`PubSub`] is the topic hub: publishers are registered per topic and
//!   every subscriber receives each message through its own
//!   `tokio::sync::broadcast` receiver.
//! - [`Subscriber`] runs a long-lived loop that hands every received
//!   [`PubSubMessage`] to a handler.

pub mod bus;
pub mod subscriber;

pub use bus::{PubSub, PubSubError, PubSubMessage};
pub use subscriber::{log_message, HandlerResult, Subscriber};
