//! Core type definitions for the Aria client coordination layer.
//!
//! This crate provides the shared vocabulary of the focus holder and the
//! context manager. Apart from the blocking-policy conflict rules, no business
//! logic lives here.

pub mod async_key;
pub mod context;
pub mod dialog;
pub mod focus;
pub mod ids;
pub mod notification;
pub mod policy;

// Re-export primary types at crate root for ergonomic use.
pub use async_key::{AsyncKey, AsyncKeyState};
pub use context::{ContextInfo, ContextType};
pub use dialog::DialogState;
pub use focus::{FocusChannelPriority, FocusState};
pub use ids::{DialogRequestId, MessageId};
pub use notification::{
    DialogStateChanged, DirectiveNotification, DirectiveProcessing, DirectiveReceived,
    EventLifecycle, EventNotification,
};
pub use policy::{BlockingPolicy, Medium, MediumSet};
