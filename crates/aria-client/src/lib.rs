//! Aria client coordination layer.
//!
//! Ties together the notification bus ([`aria_fabric`]), the background
//! focus holder ([`aria_focus`]) and the context manager
//! ([`aria_context`]) behind one configuration and one lifecycle.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # async fn run(arbiter: Arc<dyn aria_focus::FocusArbiter>) -> Result<(), aria_client::ClientError> {
//! use aria_client::{init_tracing, ClientConfig, ClientRuntime};
//!
//! let config = ClientConfig::load(Some("aria.toml"))?;
//! init_tracing(&config.logging)?;
//!
//! let runtime = ClientRuntime::start(&config, arbiter).await;
//! // ... publish notifications on runtime.bus(), register context providers ...
//! runtime.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod runtime;
pub mod telemetry;

pub use config::{ClientConfig, LoggingConfig};
pub use error::{ClientError, ClientResult};
pub use runtime::ClientRuntime;
pub use telemetry::init_tracing;

pub use aria_context::{ContextCompletion, ContextManager, ContextProvider};
pub use aria_fabric::{BusConfig, ClientBus};
pub use aria_focus::{FocusArbiter, FocusChannelDelegate, FocusHolder, FocusHolderConfig};
