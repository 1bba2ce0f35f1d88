use thiserror::Error;

/// Errors from notification stream operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("stream '{stream}' is closed")]
    Closed { stream: String },
}
