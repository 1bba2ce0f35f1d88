//! Context aggregation.
//!
//! Each capability (and the client itself) registers a [`ContextProvider`].
//! A snapshot asks every registered provider in parallel and returns once
//! all of them have answered, dropped their completion, or, when
//! [`ContextConfig::provider_timeout_ms`] is set, run out of time.
//!
//! Snapshots destined for one capability are redacted: other capabilities
//! only expose their `version`.

pub mod config;
pub mod manager;
pub mod provider;
pub mod redact;

pub use config::ContextConfig;
pub use manager::{ContextManager, ProviderRef};
pub use provider::{ContextCompletion, ContextProvider};
pub use redact::redact_for_namespace;
