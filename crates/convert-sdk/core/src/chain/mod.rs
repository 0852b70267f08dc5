use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ConversionDirection;

pub mod rpc_client;

/// Sentinel address identifying the UTXO currency in conversion amount requests
pub const UTXO_CURRENCY_ADDRESS: &str = "0x0090000000000000000000000000000000000000";
/// Sentinel address identifying the ledger currency in conversion amount requests
pub const LEDGER_CURRENCY_ADDRESS: &str = "0x0010000000000000000000000000000000000000";

#[derive(Debug, Error, Clone)]
pub enum ChainClientError {
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Service connectivity: {0}")]
    ServiceConnectivity(String),
    #[error("Generic: {0}")]
    Generic(String),
}

impl From<serde_json::Error> for ChainClientError {
    fn from(value: serde_json::Error) -> Self {
        ChainClientError::InvalidResponse(value.to_string())
    }
}

/// Read-only chain access needed to quote conversions.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the output, in destination base units, for `unit_amount` source base units
    /// at the latest rate.
    async fn get_latest_rate(
        &self,
        direction: ConversionDirection,
        unit_amount: u128,
    ) -> Result<u128, ChainClientError>;

    /// Computes the exact conversion output for `request.value` base units.
    async fn calculate_conversion_amount(
        &self,
        request: ConversionAmountRequest,
    ) -> Result<u128, ChainClientError>;
}

/// Exact conversion amount request. `from` and `to` are the sentinel currency
/// addresses, `value` an integer base-unit amount.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConversionAmountRequest {
    pub from: String,
    pub to: String,
    pub value: String,
}

impl ConversionAmountRequest {
    pub fn new(direction: ConversionDirection, value: u128) -> Self {
        let (from, to) = direction.currency_addresses();
        Self {
            from: from.to_string(),
            to: to.to_string(),
            value: value.to_string(),
        }
    }
}
