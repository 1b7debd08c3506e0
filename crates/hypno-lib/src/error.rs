use thiserror::Error;

/// Errors raised when the chart core is handed malformed input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ChartError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ChartError::InvalidArgument(msg.into())
    }
}

pub type ChartResult<T> = std::result::Result<T, ChartError>;
