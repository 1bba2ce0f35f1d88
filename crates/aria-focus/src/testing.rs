//! In-memory focus arbiter for tests.
//!
//! Grants focus to whoever asks, records every call, and reports
//! `background`/`none` back to the delegate on acquisition and release.

use std::collections::HashMap;
use std::sync::Weak;

use aria_types::{FocusChannelPriority, FocusState};
use parking_lot::Mutex;

use crate::arbiter::{FocusArbiter, FocusChannelDelegate, FocusChannelId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArbiterCall {
    Request,
    Release,
}

struct Channel {
    priority: FocusChannelPriority,
    delegate: Weak<dyn FocusChannelDelegate>,
    holding: bool,
}

#[derive(Default)]
struct Inner {
    channels: HashMap<FocusChannelId, Channel>,
    calls: Vec<ArbiterCall>,
    registrations: usize,
    acquisitions: usize,
}

#[derive(Default)]
pub struct RecordingArbiter {
    inner: Mutex<Inner>,
}

impl RecordingArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registrations(&self) -> usize {
        self.inner.lock().registrations
    }

    pub fn registered_priority(&self, channel: &FocusChannelId) -> Option<FocusChannelPriority> {
        self.inner.lock().channels.get(channel).map(|c| c.priority)
    }

    pub fn is_holding(&self, channel: &FocusChannelId) -> bool {
        self.inner
            .lock()
            .channels
            .get(channel)
            .map(|c| c.holding)
            .unwrap_or(false)
    }

    /// Number of idle-to-held transitions across all channels.
    pub fn acquisitions(&self) -> usize {
        self.inner.lock().acquisitions
    }

    pub fn request_count(&self) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| **c == ArbiterCall::Request)
            .count()
    }

    pub fn calls(&self) -> Vec<ArbiterCall> {
        self.inner.lock().calls.clone()
    }

    pub fn delegate_alive(&self, channel: &FocusChannelId) -> bool {
        self.inner
            .lock()
            .channels
            .get(channel)
            .map(|c| c.delegate.strong_count() > 0)
            .unwrap_or(false)
    }

    /// Deliver a focus state to the channel's delegate, if it is still alive.
    pub fn notify(&self, channel: &FocusChannelId, state: FocusState) {
        let delegate = self
            .inner
            .lock()
            .channels
            .get(channel)
            .and_then(|c| c.delegate.upgrade());
        if let Some(delegate) = delegate {
            delegate.focus_state_changed(state);
        }
    }
}

impl FocusArbiter for RecordingArbiter {
    fn register(
        &self,
        channel: FocusChannelId,
        priority: FocusChannelPriority,
        delegate: Weak<dyn FocusChannelDelegate>,
    ) {
        let mut inner = self.inner.lock();
        inner.registrations += 1;
        inner.channels.insert(
            channel,
            Channel {
                priority,
                delegate,
                holding: false,
            },
        );
    }

    fn request_focus(&self, channel: &FocusChannelId) {
        let acquired = {
            let mut inner = self.inner.lock();
            inner.calls.push(ArbiterCall::Request);
            let acquired = match inner.channels.get_mut(channel) {
                Some(c) if !c.holding => {
                    c.holding = true;
                    true
                }
                _ => false,
            };
            if acquired {
                inner.acquisitions += 1;
            }
            acquired
        };
        if acquired {
            self.notify(channel, FocusState::Background);
        }
    }

    fn release_focus(&self, channel: &FocusChannelId) {
        let released = {
            let mut inner = self.inner.lock();
            inner.calls.push(ArbiterCall::Release);
            match inner.channels.get_mut(channel) {
                Some(c) if c.holding => {
                    c.holding = false;
                    true
                }
                _ => false,
            }
        };
        if released {
            self.notify(channel, FocusState::Nothing);
        }
    }
}
