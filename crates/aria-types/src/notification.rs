//! Notifications published by the client's producers.
//!
//! Each type travels on its own stream: event transmission, directive
//! receipt, directive processing, and dialog state.

use serde::{Deserialize, Serialize};

use crate::dialog::DialogState;
use crate::ids::{DialogRequestId, MessageId};
use crate::policy::BlockingPolicy;

/// Header of an outbound event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNotification {
    /// `"<namespace>.<name>"`, e.g. `"TTS.SpeechFinished"`
    pub event_type: String,
    pub message_id: MessageId,
}

impl EventNotification {
    pub fn new(event_type: impl Into<String>, message_id: impl Into<MessageId>) -> Self {
        Self {
            event_type: event_type.into(),
            message_id: message_id.into(),
        }
    }
}

/// Header and blocking policy of an inbound directive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveNotification {
    /// `"<namespace>.<name>"`, e.g. `"ASR.NotifyResult"`
    pub directive_type: String,
    pub message_id: MessageId,
    pub dialog_request_id: DialogRequestId,
    #[serde(default)]
    pub blocking_policy: BlockingPolicy,
}

impl DirectiveNotification {
    pub fn new(
        directive_type: impl Into<String>,
        message_id: impl Into<MessageId>,
        dialog_request_id: impl Into<DialogRequestId>,
        blocking_policy: BlockingPolicy,
    ) -> Self {
        Self {
            directive_type: directive_type.into(),
            message_id: message_id.into(),
            dialog_request_id: dialog_request_id.into(),
            blocking_policy,
        }
    }
}

/// Outbound event transmission phases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum EventLifecycle {
    /// The event is about to be handed to the transport.
    WillSend(EventNotification),
    /// The transport finished sending the event.
    Sent(EventNotification),
}

impl EventLifecycle {
    pub fn event(&self) -> &EventNotification {
        match self {
            EventLifecycle::WillSend(event) | EventLifecycle::Sent(event) => event,
        }
    }
}

/// A directive arrived from the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveReceived {
    pub directive: DirectiveNotification,
}

/// Directive sequencing phases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DirectiveProcessing {
    /// The directive was admitted and is being prepared.
    Prefetch(DirectiveNotification),
    /// The directive finished (completed, cancelled or failed).
    Complete(DirectiveNotification),
}

impl DirectiveProcessing {
    pub fn directive(&self) -> &DirectiveNotification {
        match self {
            DirectiveProcessing::Prefetch(directive) | DirectiveProcessing::Complete(directive) => {
                directive
            }
        }
    }
}

/// The dialog-state tracker moved to a new state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogStateChanged {
    pub state: DialogState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::MediumSet;

    #[test]
    fn lifecycle_accessors_return_inner_header() {
        let sent = EventLifecycle::Sent(EventNotification::new("TTS.SpeechFinished", "m-1"));
        assert_eq!(sent.event().message_id, MessageId::from("m-1"));

        let policy = BlockingPolicy::new(Some(MediumSet::AUDIO_ONLY), Some(MediumSet::AUDIO_ONLY));
        let prefetch = DirectiveProcessing::Prefetch(DirectiveNotification::new(
            "TTS.Speak",
            "m-2",
            "d-1",
            policy,
        ));
        assert_eq!(prefetch.directive().blocking_policy, policy);
    }

    #[test]
    fn directive_without_policy_decodes_with_default() {
        let directive: DirectiveNotification = serde_json::from_str(
            r#"{"directiveType":"ASR.NotifyResult","messageId":"m","dialogRequestId":"d"}"#,
        )
        .unwrap();
        assert_eq!(directive.blocking_policy, BlockingPolicy::default());
    }
}
