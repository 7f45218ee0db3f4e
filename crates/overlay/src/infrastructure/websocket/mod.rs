//! Event feed WebSocket client.
//!
//! - `core`: runtime-free reconnect state machine and backoff math
//! - `client`: tokio-tungstenite transport driving the state machine
//! - `endpoint`: feed URL derivation from the page origin

mod client;
mod core;
mod endpoint;

pub use self::core::{
    BackoffState, ConnectionPhase, ConnectionState, ReconnectMachine, INITIAL_RETRY_DELAY_MS,
    MAX_RETRY_DELAY_MS,
};
pub use client::FeedClient;
pub use endpoint::{feed_endpoint, FEED_PATH};
