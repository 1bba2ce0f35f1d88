//! Hold-eligibility state of the background focus holder.
//!
//! [`HoldState::apply`] folds one notification into the state and returns
//! what the holder should ask of the arbiter. The holder must keep focus
//! while any in-flight set is non-empty or the dialog is not idle.

use std::collections::HashSet;

use aria_types::{
    DialogState, DialogStateChanged, DialogRequestId, DirectiveProcessing, DirectiveReceived,
    EventLifecycle, FocusState, MessageId,
};
use serde::{Deserialize, Serialize};

use crate::config::FocusHolderConfig;

/// One notification from any of the four streams.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoldInput {
    Event(EventLifecycle),
    DirectiveReceived(DirectiveReceived),
    Directive(DirectiveProcessing),
    DialogState(DialogStateChanged),
}

/// What the holder should do after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldDecision {
    Unchanged,
    RequestFocus,
    TryRelease,
}

/// Type lists from [`FocusHolderConfig`], indexed for lookup.
#[derive(Clone, Debug, Default)]
pub struct HoldRules {
    focus_targets: HashSet<String>,
    pending_targets: HashSet<String>,
}

impl HoldRules {
    pub fn from_config(config: &FocusHolderConfig) -> Self {
        Self {
            focus_targets: config.focus_targets.iter().cloned().collect(),
            pending_targets: config.pending_targets.iter().cloned().collect(),
        }
    }

    pub fn is_focus_target(&self, event_type: &str) -> bool {
        self.focus_targets.contains(event_type)
    }

    pub fn is_pending_target(&self, directive_type: &str) -> bool {
        self.pending_targets.contains(directive_type)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoldState {
    in_flight_events: HashSet<MessageId>,
    in_flight_sound_directives: HashSet<MessageId>,
    pending_dialogs: HashSet<DialogRequestId>,
    dialog_state: DialogState,
}

impl HoldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, rules: &HoldRules, input: &HoldInput) -> HoldDecision {
        match input {
            HoldInput::Event(EventLifecycle::WillSend(event)) => {
                if !rules.is_focus_target(&event.event_type) {
                    return HoldDecision::Unchanged;
                }
                self.in_flight_events.insert(event.message_id.clone());
                HoldDecision::RequestFocus
            }
            HoldInput::Event(EventLifecycle::Sent(event)) => {
                if self.in_flight_events.remove(&event.message_id) {
                    HoldDecision::TryRelease
                } else {
                    HoldDecision::Unchanged
                }
            }
            HoldInput::DirectiveReceived(DirectiveReceived { directive }) => {
                if rules.is_pending_target(&directive.directive_type) {
                    self.pending_dialogs
                        .insert(directive.dialog_request_id.clone());
                    HoldDecision::RequestFocus
                } else if self.pending_dialogs.contains(&directive.dialog_request_id) {
                    // Follow-up of a pending exchange: keep holding.
                    HoldDecision::Unchanged
                } else {
                    // An unrelated directive ends every pending exchange, even
                    // one whose real follow-up has not arrived yet.
                    self.pending_dialogs.clear();
                    HoldDecision::TryRelease
                }
            }
            HoldInput::Directive(DirectiveProcessing::Prefetch(directive)) => {
                if !directive.blocking_policy.is_audio_exclusive() {
                    return HoldDecision::Unchanged;
                }
                self.in_flight_sound_directives
                    .insert(directive.message_id.clone());
                HoldDecision::RequestFocus
            }
            HoldInput::Directive(DirectiveProcessing::Complete(directive)) => {
                if self.in_flight_sound_directives.remove(&directive.message_id) {
                    HoldDecision::TryRelease
                } else {
                    HoldDecision::Unchanged
                }
            }
            HoldInput::DialogState(DialogStateChanged { state }) => {
                self.dialog_state = *state;
                if state.is_idle() {
                    HoldDecision::TryRelease
                } else {
                    HoldDecision::RequestFocus
                }
            }
        }
    }

    /// True when nothing is in flight and the dialog is idle.
    pub fn is_releasable(&self) -> bool {
        self.in_flight_events.is_empty()
            && self.in_flight_sound_directives.is_empty()
            && self.pending_dialogs.is_empty()
            && self.dialog_state.is_idle()
    }

    pub fn dialog_state(&self) -> DialogState {
        self.dialog_state
    }

    pub(crate) fn snapshot(&self, holding: bool, last_focus_state: FocusState) -> HoldSnapshot {
        HoldSnapshot {
            in_flight_events: self.in_flight_events.clone(),
            in_flight_sound_directives: self.in_flight_sound_directives.clone(),
            pending_dialogs: self.pending_dialogs.clone(),
            dialog_state: self.dialog_state,
            holding,
            last_focus_state,
        }
    }
}

/// Point-in-time copy of the holder's state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldSnapshot {
    pub in_flight_events: HashSet<MessageId>,
    pub in_flight_sound_directives: HashSet<MessageId>,
    pub pending_dialogs: HashSet<DialogRequestId>,
    pub dialog_state: DialogState,
    /// Whether the holder currently has an outstanding focus request
    pub holding: bool,
    /// Last state reported by the arbiter (observed only)
    pub last_focus_state: FocusState,
}

impl HoldSnapshot {
    pub fn should_hold(&self) -> bool {
        !self.in_flight_events.is_empty()
            || !self.in_flight_sound_directives.is_empty()
            || !self.pending_dialogs.is_empty()
            || !self.dialog_state.is_idle()
    }
}
