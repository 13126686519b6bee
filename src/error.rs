use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Insufficient data: need {needed} samples, have {available}")]
    InsufficientData { needed: u64, available: u64 },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown filter instance: {0}")]
    UnknownInstance(u64),
}

pub type Result<T> = std::result::Result<T, FilterError>;
