use tracing::{info, warn};

use crate::{
    error::ConvertError,
    models::{ConversionDirection, ConversionOutcome},
};

use super::ConvertSdk;

const CONVERSION_FAILED: &str = "Conversion failed";

impl ConvertSdk {
    /// Submits the selected conversion to the transaction service.
    ///
    /// Does nothing when the source or destination is unset, or when they are
    /// not a UTXO/ledger pair. On success the selection is cleared after
    /// `reset_delay_ms`, unless it changes or another conversion starts first.
    pub async fn convert(&self) -> Result<ConversionOutcome, ConvertError> {
        let state = self.store.snapshot();
        let (Some(source), Some(destination)) = (&state.source, &state.destination) else {
            return Ok(ConversionOutcome::Skipped);
        };
        let Some(direction) = ConversionDirection::for_pair(Some(source), Some(destination))
        else {
            warn!(
                "Cannot convert between {} and {}, not a UTXO/ledger pair",
                source.address(),
                destination.address()
            );
            return Ok(ConversionOutcome::Skipped);
        };

        self.begin_conversion().await;

        let amount = match state.amount.trim() {
            "" => "0",
            amount => amount,
        };
        let max_slippage_bps = state.max_slippage_bps;
        info!("Converting {amount} {direction:?} with max slippage {max_slippage_bps} bps");
        let result = match direction {
            ConversionDirection::UtxoToLedger => {
                self.transaction_service
                    .convert_utxo_to_ledger(destination.address(), amount, max_slippage_bps)
                    .await
            }
            ConversionDirection::LedgerToUtxo => {
                self.transaction_service
                    .convert_ledger_to_utxo(source.address(), amount, max_slippage_bps)
                    .await
            }
        };
        if let Err(e) = result {
            warn!("Conversion {direction:?} failed: {e}");
            return Err(ConvertError::service(e, CONVERSION_FAILED));
        }

        self.schedule_reset(state.generation()).await;
        Ok(ConversionOutcome::Submitted { direction })
    }
}
