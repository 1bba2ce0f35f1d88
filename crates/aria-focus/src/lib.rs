//! Background focus holder for the Aria client.
//!
//! Keeps the client's focus channel at background priority while
//! follow-up work is in flight:
//! - focus-target events between "will send" and "sent"
//! - audio-exclusive directives between prefetch and completion
//! - dialogs awaiting a follow-up directive after a pending-target directive
//! - any non-idle dialog state
//!
//! Focus is released as soon as none of the above holds.

pub mod arbiter;
pub mod config;
pub mod error;
pub mod holder;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use arbiter::{FocusArbiter, FocusChannelDelegate, FocusChannelId};
pub use config::FocusHolderConfig;
pub use error::{FocusError, FocusResult};
pub use holder::FocusHolder;
pub use state::{HoldDecision, HoldInput, HoldRules, HoldSnapshot, HoldState};
