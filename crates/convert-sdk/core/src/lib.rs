pub mod amount;
mod chain;
mod error;
mod logger;
mod models;
mod sdk;
mod sdk_builder;
mod store;
#[cfg(test)]
mod test_utils;
mod transactions;
mod utils;

pub use amount::{
    Denomination, format_units, linear_slippage, minimum_received, parse_units,
    parse_units_or_zero,
};
pub use chain::{
    ChainClient, ChainClientError, ConversionAmountRequest, LEDGER_CURRENCY_ADDRESS,
    UTXO_CURRENCY_ADDRESS, rpc_client::JsonRpcChainClient,
};
pub use error::{AmountError, ConvertError, ErrorInfo};
pub use logger::{LogEntry, Logger};
pub use models::*;
pub use sdk::{ConvertSdk, default_config, init_logging};
pub use sdk_builder::ConvertSdkBuilder;
pub use store::ConversionStore;
pub use transactions::{TransactionService, TransactionServiceError};
