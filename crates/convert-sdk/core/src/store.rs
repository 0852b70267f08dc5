use tokio::sync::watch;
use tracing::debug;

use crate::models::{
    ConversionAccount, ConversionState, DEFAULT_MAX_SLIPPAGE_BPS, IntervalSettings,
    IntervalSettingsUpdate, LedgerAccountTotal,
};

/// Holds the conversion selection and its derived values.
///
/// Every setter is an independent atomic write. Derived values (`rate`,
/// `expected_result`, `expected_slippage`) are never recomputed here; callers
/// re-run the quoting operations after changing the selection.
pub struct ConversionStore {
    state: watch::Sender<ConversionState>,
    default_max_slippage_bps: u32,
    default_interval_settings: IntervalSettings,
}

impl Default for ConversionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionStore {
    pub fn new() -> Self {
        Self::with_defaults(DEFAULT_MAX_SLIPPAGE_BPS, IntervalSettings::default())
    }

    /// Creates a store whose initial and reset values use the given defaults.
    pub fn with_defaults(
        default_max_slippage_bps: u32,
        default_interval_settings: IntervalSettings,
    ) -> Self {
        Self {
            state: watch::Sender::new(ConversionState::with_defaults(
                default_max_slippage_bps,
                default_interval_settings,
            )),
            default_max_slippage_bps,
            default_interval_settings,
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> ConversionState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every mutation.
    pub fn subscribe(&self) -> watch::Receiver<ConversionState> {
        self.state.subscribe()
    }

    pub fn set_amount(&self, amount: impl Into<String>) {
        let amount = amount.into();
        debug!("Setting conversion amount: {amount}");
        self.modify_selection(|state| state.amount = amount);
    }

    pub fn set_source(&self, account: impl Into<ConversionAccount>) {
        let account = account.into();
        debug!("Setting conversion source: {}", account.address());
        self.modify_selection(|state| state.source = Some(account));
    }

    pub fn set_destination(&self, account: impl Into<ConversionAccount>) {
        let account = account.into();
        debug!("Setting conversion destination: {}", account.address());
        self.modify_selection(|state| state.destination = Some(account));
    }

    /// Sets the rate for the direction the current selection quotes in.
    pub fn set_rate(&self, rate: f64) {
        self.state.send_modify(|state| {
            state.rate = rate;
            state.rate_direction = Some(state.quote_direction());
        });
    }

    pub fn set_expected_result(&self, expected_result: f64) {
        self.state
            .send_modify(|state| state.expected_result = expected_result);
    }

    pub fn set_expected_slippage(&self, expected_slippage: f64) {
        self.state
            .send_modify(|state| state.expected_slippage = expected_slippage);
    }

    pub fn set_max_slippage(&self, max_slippage_bps: u32) {
        self.state
            .send_modify(|state| state.max_slippage_bps = max_slippage_bps);
    }

    pub fn set_wrapped_deposit(&self, wrapped_deposit: u128) {
        self.state
            .send_modify(|state| state.wrapped_deposit = wrapped_deposit);
    }

    /// Merges `update` into the interval settings, keeping fields it leaves unset.
    pub fn set_interval_settings(&self, update: IntervalSettingsUpdate) {
        self.state
            .send_modify(|state| state.interval_settings.merge(update));
    }

    /// Routes a newly selected ledger total to the ledger-side slot.
    ///
    /// If the destination is currently a UTXO account the user is converting
    /// from the ledger currency, so the total replaces the source; otherwise it
    /// replaces the destination. The UTXO side is never overwritten.
    pub fn update_destination_preferring_source(&self, total: LedgerAccountTotal) {
        self.modify_selection(|state| {
            let total = ConversionAccount::Ledger(total);
            if state
                .destination
                .as_ref()
                .is_some_and(ConversionAccount::is_utxo)
            {
                debug!("Routing ledger total {} to source", total.address());
                state.source = Some(total);
            } else {
                debug!("Routing ledger total {} to destination", total.address());
                state.destination = Some(total);
            }
        });
    }

    /// Clears the selection after a conversion.
    ///
    /// `expected_result` and `expected_slippage` are left as they are.
    pub fn reset(&self) {
        debug!("Resetting conversion state");
        self.modify_selection(|state| self.clear(state));
    }

    /// Resets only if the selection is still at `generation`.
    pub(crate) fn reset_if_current(&self, generation: u64) -> bool {
        self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            debug!("Resetting conversion state");
            self.clear(state);
            state.generation = state.generation.wrapping_add(1);
            true
        })
    }

    /// Applies `modify` only if the selection is still at `generation`.
    ///
    /// Returns whether the mutation was applied.
    pub(crate) fn apply_if_current<F>(&self, generation: u64, modify: F) -> bool
    where
        F: FnOnce(&mut ConversionState),
    {
        self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            modify(state);
            true
        })
    }

    fn clear(&self, state: &mut ConversionState) {
        state.source = None;
        state.destination = None;
        state.amount = String::new();
        state.rate = 0.0;
        state.rate_direction = None;
        state.max_slippage_bps = self.default_max_slippage_bps;
        state.wrapped_deposit = 0;
        state.interval_settings = self.default_interval_settings;
    }

    fn modify_selection<F>(&self, modify: F)
    where
        F: FnOnce(&mut ConversionState),
    {
        self.state.send_modify(|state| {
            modify(state);
            state.generation = state.generation.wrapping_add(1);
        });
    }
}
