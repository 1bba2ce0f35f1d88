//! Client configuration.
//!
//! Sources are layered: built-in defaults, then an optional file, then
//! `ARIA_*` environment variables. Nested keys use a double underscore,
//! e.g. `ARIA_CONTEXT__PROVIDER_TIMEOUT_MS=500`.

use aria_context::ContextConfig;
use aria_fabric::BusConfig;
use aria_focus::FocusHolderConfig;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub bus: BusConfig,

    #[serde(default)]
    pub focus: FocusHolderConfig,

    #[serde(default)]
    pub context: ContextConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Load configuration, optionally from a file. A missing file is not an
    /// error; a malformed one is.
    pub fn load(path: Option<&str>) -> ClientResult<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&ClientConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ARIA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}
