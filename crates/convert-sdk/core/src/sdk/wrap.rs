use tracing::{debug, info, warn};

use crate::{error::ConvertError, models::ConversionAccount};

use super::ConvertSdk;

const WRAP_FAILED: &str = "Wrap failed";
const UNWRAP_FAILED: &str = "Unwrap failed";

impl ConvertSdk {
    /// Wraps the selected amount of UTXO currency into the deposit-bearing token
    /// held by the ledger destination. Returns the transaction id.
    pub async fn wrap(&self) -> Result<String, ConvertError> {
        let state = self.store.snapshot();
        let (Some(ConversionAccount::Utxo(_)), Some(ConversionAccount::Ledger(destination))) =
            (&state.source, &state.destination)
        else {
            return Err(ConvertError::InvalidConversionParameters);
        };
        let amount = state.amount.trim();
        if amount.is_empty() {
            return Err(ConvertError::InvalidConversionParameters);
        }

        self.begin_conversion().await;
        info!("Wrapping {amount} into {}", destination.address);
        let tx_id = self
            .transaction_service
            .wrap(amount, &destination.address)
            .await
            .inspect_err(|e| warn!("Wrap failed: {e}"))
            .map_err(|e| ConvertError::service(e, WRAP_FAILED))?;
        debug!("Wrap submitted: {tx_id}");
        Ok(tx_id)
    }

    /// Unwraps the selected amount from the ledger source. The transaction
    /// service chooses the receiving UTXO address. Returns the transaction id.
    pub async fn unwrap(&self) -> Result<String, ConvertError> {
        let state = self.store.snapshot();
        let Some(ConversionAccount::Ledger(source)) = &state.source else {
            return Err(ConvertError::InvalidUnwrapParameters);
        };
        let amount = state.amount.trim();
        if amount.is_empty() {
            return Err(ConvertError::InvalidUnwrapParameters);
        }

        self.begin_conversion().await;
        info!("Unwrapping {amount} from {}", source.address);
        let tx_id = self
            .transaction_service
            .unwrap(amount, &source.address)
            .await
            .inspect_err(|e| warn!("Unwrap failed: {e}"))
            .map_err(|e| ConvertError::service(e, UNWRAP_FAILED))?;
        debug!("Unwrap submitted: {tx_id}");
        Ok(tx_id)
    }

    pub async fn claim_wrapped_deposit(&self, address: &str) -> Result<(), ConvertError> {
        info!("Claiming wrapped deposit of {address}");
        self.transaction_service
            .claim_wrapped_deposit(address)
            .await
            .map_err(|e| ConvertError::service(e, "Claim failed"))
    }

    /// Fetches the claimable wrap deposit of `address` and records it in the store.
    pub async fn fetch_wrapped_deposit(&self, address: &str) -> Result<u128, ConvertError> {
        let deposit = self
            .transaction_service
            .get_wrapped_deposit(address)
            .await
            .map_err(|e| ConvertError::service(e, "Failed to fetch wrapped deposit"))?;
        self.store.set_wrapped_deposit(deposit);
        Ok(deposit)
    }
}
