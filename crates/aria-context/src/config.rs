use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Context manager configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Per-provider deadline in milliseconds. `None` waits for every
    /// provider however long it takes.
    #[serde(default)]
    pub provider_timeout_ms: Option<u64>,
}

impl ContextConfig {
    pub fn with_provider_timeout(timeout: Duration) -> Self {
        Self {
            provider_timeout_ms: Some(timeout.as_millis() as u64),
        }
    }

    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_ms.map(Duration::from_millis)
    }
}
