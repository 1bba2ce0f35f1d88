//! Contract with the external focus arbiter.
//!
//! The arbiter grants an exclusive output channel to at most one
//! priority-ranked requester at a time. Requests and releases are
//! fire-and-forget and must be idempotent on the arbiter side.

use std::sync::Weak;

use aria_types::{FocusChannelPriority, FocusState};
use serde::{Deserialize, Serialize};

/// Identifies one registered focus channel at the arbiter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocusChannelId(pub uuid::Uuid);

impl FocusChannelId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for FocusChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FocusChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "focus:{}", self.0)
    }
}

/// Receives focus state changes from the arbiter.
pub trait FocusChannelDelegate: Send + Sync {
    fn focus_state_changed(&self, state: FocusState);
}

/// The focus arbiter as seen by a requester.
pub trait FocusArbiter: Send + Sync {
    /// Register a channel. The arbiter only keeps a non-owning reference to
    /// the delegate; callbacks to a dropped delegate must be skipped.
    fn register(
        &self,
        channel: FocusChannelId,
        priority: FocusChannelPriority,
        delegate: Weak<dyn FocusChannelDelegate>,
    );

    /// Ask for focus. Repeated requests while holding are no-ops.
    fn request_focus(&self, channel: &FocusChannelId);

    /// Give focus back. Releasing a channel that holds nothing is a no-op.
    fn release_focus(&self, channel: &FocusChannelId);
}
