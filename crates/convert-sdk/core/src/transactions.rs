use thiserror::Error;

use crate::models::{IntervalConversion, IntervalConversionRequest};

/// Error returned by a [`TransactionService`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionServiceError {
    /// A structured failure carrying an optional machine-readable code
    #[error("{message}")]
    Service {
        message: String,
        code: Option<String>,
    },
    /// A bare message without further structure
    #[error("{0}")]
    Generic(String),
}

impl TransactionServiceError {
    pub fn message(&self) -> &str {
        match self {
            TransactionServiceError::Service { message, .. } => message,
            TransactionServiceError::Generic(message) => message,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            TransactionServiceError::Service { code, .. } => code.as_deref(),
            TransactionServiceError::Generic(_) => None,
        }
    }
}

/// Builds, signs and submits conversion transactions, and owns interval jobs.
///
/// Amounts are decimal strings in the source denomination of the conversion.
#[async_trait::async_trait]
pub trait TransactionService: Send + Sync {
    /// Converts UTXO currency into the ledger account at `destination_address`.
    async fn convert_utxo_to_ledger(
        &self,
        destination_address: &str,
        amount: &str,
        max_slippage_bps: u32,
    ) -> Result<(), TransactionServiceError>;

    /// Converts ledger currency held by `source_address` into UTXO currency.
    async fn convert_ledger_to_utxo(
        &self,
        source_address: &str,
        amount: &str,
        max_slippage_bps: u32,
    ) -> Result<(), TransactionServiceError>;

    /// Wraps UTXO currency into the deposit-bearing token, returning the transaction id.
    async fn wrap(
        &self,
        amount: &str,
        destination_address: &str,
    ) -> Result<String, TransactionServiceError>;

    /// Unwraps the deposit-bearing token held by `source_address`. The service picks
    /// the receiving UTXO address itself.
    async fn unwrap(
        &self,
        amount: &str,
        source_address: &str,
    ) -> Result<String, TransactionServiceError>;

    async fn claim_wrapped_deposit(&self, address: &str) -> Result<(), TransactionServiceError>;

    /// Returns the claimable wrap deposit of `address` in base units.
    async fn get_wrapped_deposit(&self, address: &str) -> Result<u128, TransactionServiceError>;

    /// Schedules a recurring conversion, returning the job id.
    async fn start_interval_conversion(
        &self,
        request: IntervalConversionRequest,
    ) -> Result<String, TransactionServiceError>;

    async fn list_interval_conversions(
        &self,
    ) -> Result<Vec<IntervalConversion>, TransactionServiceError>;

    async fn get_interval_conversion(
        &self,
        id: &str,
    ) -> Result<Option<IntervalConversion>, TransactionServiceError>;

    async fn cancel_interval_conversion(&self, id: &str) -> Result<(), TransactionServiceError>;
}
