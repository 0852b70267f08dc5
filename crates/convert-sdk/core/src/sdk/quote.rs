use tracing::{debug, warn};

use crate::{
    amount::{
        amount_to_f64, linear_slippage, minimum_received, parse_units_or_zero, units_to_f64,
    },
    chain::ConversionAmountRequest,
    error::ConvertError,
    models::{ExpectedConversion, Refresh},
};

use super::ConvertSdk;

impl ConvertSdk {
    /// Fetches the latest unit rate for the current direction and stores it in `rate`.
    ///
    /// The rate is the amount of the destination currency one whole unit of the
    /// source currency buys. Chain client failures are returned as
    /// [`ConvertError::Chain`] and leave the store untouched.
    pub async fn refresh_rate(&self) -> Result<Refresh<f64>, ConvertError> {
        let state = self.store.snapshot();
        let direction = state.quote_direction();

        let rate_units = self
            .chain_client
            .get_latest_rate(direction, direction.source_denomination().one())
            .await?;
        let rate = units_to_f64(rate_units, direction.destination_denomination());

        if self
            .store
            .apply_if_current(state.generation(), |state| {
                state.rate = rate;
                state.rate_direction = Some(direction);
            })
        {
            debug!("Rate for {direction:?} updated to {rate}");
            Ok(Refresh::Applied(rate))
        } else {
            warn!("Selection changed while quoting {direction:?}, discarding rate {rate}");
            Ok(Refresh::Discarded)
        }
    }

    /// Computes the exact output for the current amount and stores it in
    /// `expected_result`, together with the slippage against the quoted rate.
    ///
    /// When the quoted rate or the amount is zero, or the rate was quoted for
    /// the other direction, `expected_slippage` keeps its previous value.
    pub async fn refresh_expected_result(
        &self,
    ) -> Result<Refresh<ExpectedConversion>, ConvertError> {
        let state = self.store.snapshot();
        let direction = state.quote_direction();
        let amount_in = parse_units_or_zero(&state.amount, direction.source_denomination());

        let amount_out = self
            .chain_client
            .calculate_conversion_amount(ConversionAmountRequest::new(direction, amount_in))
            .await?;
        let expected_result = units_to_f64(amount_out, direction.destination_denomination());
        let expected_slippage = state.current_rate().and_then(|rate| {
            linear_slippage(rate, amount_to_f64(&state.amount), expected_result)
        });

        let applied = self.store.apply_if_current(state.generation(), |state| {
            state.expected_result = expected_result;
            if let Some(slippage) = expected_slippage {
                state.expected_slippage = slippage;
            }
        });
        if !applied {
            warn!(
                "Selection changed while computing expected result, discarding {expected_result}"
            );
            return Ok(Refresh::Discarded);
        }

        debug!(
            "Expected {expected_result} for {} {direction:?}, slippage {expected_slippage:?}",
            state.amount
        );
        Ok(Refresh::Applied(ExpectedConversion {
            direction,
            amount_in,
            amount_out,
            expected_result,
            expected_slippage,
            minimum_received: minimum_received(amount_out, state.max_slippage_bps),
        }))
    }
}
