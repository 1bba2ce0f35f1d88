use aria_fabric::BusError;
use aria_focus::FocusError;
use thiserror::Error;

/// Errors surfaced by the client facade.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("bus error: {0}")]
    Bus(#[from] BusError),

    #[error("focus error: {0}")]
    Focus(#[from] FocusError),

    #[error("telemetry error: {0}")]
    Telemetry(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
