//! Coordinator wiring.

use std::sync::Arc;

use aria_context::ContextManager;
use aria_fabric::ClientBus;
use aria_focus::{FocusArbiter, FocusHolder};
use tracing::info;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// The client's coordination layer: notification bus, background focus
/// holder and context manager, started together and torn down together.
pub struct ClientRuntime {
    bus: ClientBus,
    focus: FocusHolder,
    context: Arc<ContextManager>,
}

impl ClientRuntime {
    /// Build the bus and start the focus holder against `arbiter`.
    pub async fn start(config: &ClientConfig, arbiter: Arc<dyn FocusArbiter>) -> Self {
        let bus = ClientBus::new(&config.bus);
        let focus = FocusHolder::spawn(&config.focus, arbiter, &bus).await;
        let context = Arc::new(ContextManager::new(config.context.clone()));

        info!(
            channel = %focus.channel_id(),
            channel_capacity = config.bus.channel_capacity,
            "Client runtime started"
        );

        Self {
            bus,
            focus,
            context,
        }
    }

    /// Producers publish here.
    pub fn bus(&self) -> &ClientBus {
        &self.bus
    }

    pub fn focus(&self) -> &FocusHolder {
        &self.focus
    }

    pub fn context(&self) -> &Arc<ContextManager> {
        &self.context
    }

    /// Stop the focus holder (releasing any held focus), then close the bus.
    pub async fn shutdown(self) -> ClientResult<()> {
        let Self { bus, focus, .. } = self;
        focus.shutdown().await?;
        bus.close().await;
        info!("Client runtime stopped");
        Ok(())
    }
}
