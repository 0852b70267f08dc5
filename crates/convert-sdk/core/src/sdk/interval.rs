use tracing::{info, warn};

use crate::{
    error::ConvertError,
    models::{IntervalConversion, IntervalConversionRequest},
};

use super::ConvertSdk;

const START_INTERVAL_FAILED: &str = "Failed to start interval conversion";

impl ConvertSdk {
    /// Asks the transaction service to run the selected conversion repeatedly,
    /// using the store's interval settings. Returns the job id.
    ///
    /// Requires a source, a destination and enabled interval settings. Running
    /// jobs are owned by the transaction service; nothing is kept locally.
    pub async fn start_interval_conversion(&self) -> Result<String, ConvertError> {
        let state = self.store.snapshot();
        let (Some(source), Some(destination)) = (state.source, state.destination) else {
            return Err(ConvertError::InvalidIntervalParameters);
        };
        let settings = state.interval_settings;
        if !settings.enabled {
            return Err(ConvertError::InvalidIntervalParameters);
        }

        self.begin_conversion().await;
        let amount = match state.amount.trim() {
            "" => "0".to_string(),
            amount => amount.to_string(),
        };
        info!(
            "Starting interval conversion of {amount}, {} transactions every {} minutes",
            settings.transaction_count, settings.interval_minutes
        );
        let id = self
            .transaction_service
            .start_interval_conversion(IntervalConversionRequest {
                source,
                destination,
                amount,
                max_slippage_bps: state.max_slippage_bps,
                transaction_count: settings.transaction_count,
                interval_minutes: settings.interval_minutes,
            })
            .await
            .inspect_err(|e| warn!("Interval conversion start failed: {e}"))
            .map_err(|e| ConvertError::service(e, START_INTERVAL_FAILED))?;
        info!("Interval conversion {id} started");
        Ok(id)
    }

    pub async fn list_interval_conversions(&self) -> Result<Vec<IntervalConversion>, ConvertError> {
        self.transaction_service
            .list_interval_conversions()
            .await
            .map_err(|e| ConvertError::service(e, "Failed to list interval conversions"))
    }

    pub async fn get_interval_conversion(
        &self,
        id: &str,
    ) -> Result<Option<IntervalConversion>, ConvertError> {
        self.transaction_service
            .get_interval_conversion(id)
            .await
            .map_err(|e| ConvertError::service(e, "Failed to get interval conversion"))
    }

    /// Cancels a running job and returns its id.
    pub async fn cancel_interval_conversion(&self, id: &str) -> Result<String, ConvertError> {
        info!("Cancelling interval conversion {id}");
        self.transaction_service
            .cancel_interval_conversion(id)
            .await
            .map_err(|e| ConvertError::service(e, "Failed to cancel interval conversion"))?;
        Ok(id.to_string())
    }
}
