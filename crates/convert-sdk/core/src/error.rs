use serde::Serialize;
use thiserror::Error;

use crate::{chain::ChainClientError, transactions::TransactionServiceError};

/// Error type for every asynchronous `ConvertSdk` operation
#[derive(Debug, Error, Clone)]
pub enum ConvertError {
    #[error("Invalid conversion parameters")]
    InvalidConversionParameters,

    #[error("Invalid unwrap parameters")]
    InvalidUnwrapParameters,

    #[error("Invalid interval conversion parameters")]
    InvalidIntervalParameters,

    #[error("Chain client error: {0}")]
    Chain(#[from] ChainClientError),

    /// A failure reported by the transaction service
    #[error("{message}")]
    Service {
        message: String,
        code: Option<String>,
    },

    #[error("Error: {0}")]
    Generic(String),
}

impl ConvertError {
    /// Wraps a transaction service failure, substituting `fallback` when the
    /// service gave no message.
    pub(crate) fn service(error: TransactionServiceError, fallback: &str) -> Self {
        let message = match error.message() {
            "" => fallback.to_string(),
            message => message.to_string(),
        };
        ConvertError::Service {
            message,
            code: error.code().map(ToString::to_string),
        }
    }

    /// The error code attached by the transaction service, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            ConvertError::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Structured form of the error, suitable for rendering inline in a UI.
    pub fn info(&self) -> ErrorInfo {
        ErrorInfo {
            message: match self {
                ConvertError::Service { message, .. } => message.clone(),
                other => other.to_string(),
            },
            code: self.code().map(ToString::to_string),
        }
    }
}

/// `{ message, code? }` view of a [`ConvertError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<&ConvertError> for ErrorInfo {
    fn from(error: &ConvertError) -> Self {
        error.info()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("not a decimal number: {0}")]
    InvalidNumber(String),

    #[error("{decimals} fraction digits, at most {max} allowed")]
    TooManyDecimals { decimals: u32, max: u32 },

    #[error("amount does not fit in base units")]
    Overflow,
}
