//! Notification fabric: one typed stream per producer.
//!
//! Producers publish into an [`EventChannel`]; consumers hold a
//! [`Subscription`] that they cancel explicitly on teardown, or forward
//! several streams into one queue of their own with
//! [`EventChannel::subscribe_into`]. The
//! [`ClientBus`] bundles the four streams the client's coordination layer
//! listens to:
//! - outbound event transmission ([`EventLifecycle`])
//! - inbound directive receipt ([`DirectiveReceived`])
//! - directive sequencing ([`DirectiveProcessing`])
//! - dialog state ([`DialogStateChanged`])

pub mod channel;
pub mod error;
pub mod types;

use aria_types::{DialogStateChanged, DirectiveProcessing, DirectiveReceived, EventLifecycle};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use channel::{EventChannel, Forwarding, Subscription};
pub use error::BusError;
pub use types::SubscriptionId;

/// Configuration for the notification fabric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    /// Per-subscriber queue capacity
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    1024
}

/// The four notification streams of the client.
#[derive(Clone)]
pub struct ClientBus {
    events: EventChannel<EventLifecycle>,
    directive_receipts: EventChannel<DirectiveReceived>,
    directive_processing: EventChannel<DirectiveProcessing>,
    dialog_states: EventChannel<DialogStateChanged>,
}

impl ClientBus {
    pub fn new(config: &BusConfig) -> Self {
        let capacity = config.channel_capacity;
        Self {
            events: EventChannel::new("event_lifecycle", capacity),
            directive_receipts: EventChannel::new("directive_receipt", capacity),
            directive_processing: EventChannel::new("directive_processing", capacity),
            dialog_states: EventChannel::new("dialog_state", capacity),
        }
    }

    pub fn events(&self) -> &EventChannel<EventLifecycle> {
        &self.events
    }

    pub fn directive_receipts(&self) -> &EventChannel<DirectiveReceived> {
        &self.directive_receipts
    }

    pub fn directive_processing(&self) -> &EventChannel<DirectiveProcessing> {
        &self.directive_processing
    }

    pub fn dialog_states(&self) -> &EventChannel<DialogStateChanged> {
        &self.dialog_states
    }

    /// Total subscriptions across all four streams.
    pub async fn subscription_count(&self) -> usize {
        self.events.subscription_count().await
            + self.directive_receipts.subscription_count().await
            + self.directive_processing.subscription_count().await
            + self.dialog_states.subscription_count().await
    }

    /// Close every stream.
    pub async fn close(&self) {
        self.events.close().await;
        self.directive_receipts.close().await;
        self.directive_processing.close().await;
        self.dialog_states.close().await;
        info!("Client bus closed");
    }
}

impl Default for ClientBus {
    fn default() -> Self {
        Self::new(&BusConfig::default())
    }
}
