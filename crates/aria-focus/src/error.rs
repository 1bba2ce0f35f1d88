use thiserror::Error;

/// Errors from focus holder operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FocusError {
    #[error("focus holder has been torn down")]
    Stopped,
}

pub type FocusResult<T> = Result<T, FocusError>;
