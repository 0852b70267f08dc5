use serde::{Deserialize, Serialize};

use crate::{
    amount::Denomination,
    chain::{LEDGER_CURRENCY_ADDRESS, UTXO_CURRENCY_ADDRESS},
};

/// Default maximum slippage for conversions in basis points (1%)
pub const DEFAULT_MAX_SLIPPAGE_BPS: u32 = 100;
/// Default delay before a completed conversion clears the selection
pub const DEFAULT_RESET_DELAY_MS: u64 = 2_000;
/// Default number of transactions an interval conversion repeats
pub const DEFAULT_INTERVAL_TRANSACTION_COUNT: u32 = 10;
/// Default minutes between two transactions of an interval conversion
pub const DEFAULT_INTERVAL_MINUTES: u32 = 1;

/// An account holding the UTXO currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoAccount {
    pub address: String,
    pub label: Option<String>,
}

/// The running total of an account holding the ledger currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccountTotal {
    pub address: String,
    pub label: Option<String>,
}

/// One side of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConversionAccount {
    Utxo(UtxoAccount),
    Ledger(LedgerAccountTotal),
}

impl ConversionAccount {
    pub fn address(&self) -> &str {
        match self {
            ConversionAccount::Utxo(account) => &account.address,
            ConversionAccount::Ledger(account) => &account.address,
        }
    }

    pub fn is_utxo(&self) -> bool {
        matches!(self, ConversionAccount::Utxo(_))
    }

    pub fn is_ledger(&self) -> bool {
        matches!(self, ConversionAccount::Ledger(_))
    }

    pub fn denomination(&self) -> Denomination {
        match self {
            ConversionAccount::Utxo(_) => Denomination::Utxo,
            ConversionAccount::Ledger(_) => Denomination::Ledger,
        }
    }
}

impl From<UtxoAccount> for ConversionAccount {
    fn from(account: UtxoAccount) -> Self {
        ConversionAccount::Utxo(account)
    }
}

impl From<LedgerAccountTotal> for ConversionAccount {
    fn from(account: LedgerAccountTotal) -> Self {
        ConversionAccount::Ledger(account)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionDirection {
    /// Converting from the UTXO currency into the ledger currency
    UtxoToLedger,
    /// Converting from the ledger currency into the UTXO currency
    LedgerToUtxo,
}

impl ConversionDirection {
    /// Direction used for quoting and expected results: only the source decides,
    /// anything but a UTXO source quotes the ledger side.
    pub fn for_quote(source: Option<&ConversionAccount>) -> Self {
        match source {
            Some(ConversionAccount::Utxo(_)) => ConversionDirection::UtxoToLedger,
            _ => ConversionDirection::LedgerToUtxo,
        }
    }

    /// Direction of a complete selection, `None` unless exactly one side is UTXO.
    ///
    /// Whenever this returns `Some`, it agrees with [`Self::for_quote`].
    pub fn for_pair(
        source: Option<&ConversionAccount>,
        destination: Option<&ConversionAccount>,
    ) -> Option<Self> {
        match (source?, destination?) {
            (ConversionAccount::Utxo(_), ConversionAccount::Ledger(_)) => {
                Some(ConversionDirection::UtxoToLedger)
            }
            (ConversionAccount::Ledger(_), ConversionAccount::Utxo(_)) => {
                Some(ConversionDirection::LedgerToUtxo)
            }
            _ => None,
        }
    }

    pub fn source_denomination(self) -> Denomination {
        match self {
            ConversionDirection::UtxoToLedger => Denomination::Utxo,
            ConversionDirection::LedgerToUtxo => Denomination::Ledger,
        }
    }

    pub fn destination_denomination(self) -> Denomination {
        match self {
            ConversionDirection::UtxoToLedger => Denomination::Ledger,
            ConversionDirection::LedgerToUtxo => Denomination::Utxo,
        }
    }

    /// Sentinel currency addresses as `(from, to)` for the conversion amount calculator.
    pub fn currency_addresses(self) -> (&'static str, &'static str) {
        match self {
            ConversionDirection::UtxoToLedger => (UTXO_CURRENCY_ADDRESS, LEDGER_CURRENCY_ADDRESS),
            ConversionDirection::LedgerToUtxo => (LEDGER_CURRENCY_ADDRESS, UTXO_CURRENCY_ADDRESS),
        }
    }
}

/// The user's request for a recurring conversion. Describes a job to start,
/// not a running one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSettings {
    pub enabled: bool,
    pub transaction_count: u32,
    pub interval_minutes: u32,
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            transaction_count: DEFAULT_INTERVAL_TRANSACTION_COUNT,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
        }
    }
}

/// Partial update merged into [`IntervalSettings`]; unset fields are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSettingsUpdate {
    pub enabled: Option<bool>,
    pub transaction_count: Option<u32>,
    pub interval_minutes: Option<u32>,
}

impl IntervalSettings {
    pub(crate) fn merge(&mut self, update: IntervalSettingsUpdate) {
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
        if let Some(transaction_count) = update.transaction_count {
            self.transaction_count = transaction_count;
        }
        if let Some(interval_minutes) = update.interval_minutes {
            self.interval_minutes = interval_minutes;
        }
    }
}

/// Everything the conversion screen works from.
///
/// `rate`, `expected_result` and `expected_slippage` are derived from the
/// selection and go stale whenever `source`, `destination` or `amount` change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionState {
    pub source: Option<ConversionAccount>,
    pub destination: Option<ConversionAccount>,
    /// Decimal amount in the source denomination, empty when unset
    pub amount: String,
    /// Latest unit rate for the current direction, 0 until quoted
    pub rate: f64,
    /// Latest exact output amount in the destination denomination
    pub expected_result: f64,
    pub expected_slippage: f64,
    pub max_slippage_bps: u32,
    /// Claimable wrap deposit in base units
    pub wrapped_deposit: u128,
    pub interval_settings: IntervalSettings,
    #[serde(skip)]
    pub(crate) generation: u64,
    /// Direction `rate` was quoted in, `None` while no rate is set
    #[serde(skip)]
    pub(crate) rate_direction: Option<ConversionDirection>,
}

impl Default for ConversionState {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_MAX_SLIPPAGE_BPS, IntervalSettings::default())
    }
}

impl ConversionState {
    pub(crate) fn with_defaults(
        max_slippage_bps: u32,
        interval_settings: IntervalSettings,
    ) -> Self {
        Self {
            source: None,
            destination: None,
            amount: String::new(),
            rate: 0.0,
            expected_result: 0.0,
            expected_slippage: 0.0,
            max_slippage_bps,
            wrapped_deposit: 0,
            interval_settings,
            generation: 0,
            rate_direction: None,
        }
    }

    /// Selection generation, bumped every time source, destination or amount change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Direction of the current selection, if it is a valid UTXO/ledger pair.
    pub fn direction(&self) -> Option<ConversionDirection> {
        ConversionDirection::for_pair(self.source.as_ref(), self.destination.as_ref())
    }

    /// Direction the rate and expected result are quoted in.
    pub fn quote_direction(&self) -> ConversionDirection {
        ConversionDirection::for_quote(self.source.as_ref())
    }

    /// The rate, if it was quoted in the direction the selection quotes in now.
    pub fn current_rate(&self) -> Option<f64> {
        (self.rate_direction == Some(self.quote_direction())).then_some(self.rate)
    }
}

/// Outcome of a conversion execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConversionOutcome {
    /// The conversion was handed to the transaction service
    Submitted { direction: ConversionDirection },
    /// The selection was incomplete or not a UTXO/ledger pair, nothing was sent
    Skipped,
}

/// Outcome of refreshing a derived value.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh<T> {
    /// The result was written to the store
    Applied(T),
    /// The selection changed while the request was in flight and the result was dropped
    Discarded,
}

impl<T> Refresh<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Refresh::Applied(value) => Some(value),
            Refresh::Discarded => None,
        }
    }
}

/// Result of the expected-result calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedConversion {
    pub direction: ConversionDirection,
    /// Parsed input in source base units
    pub amount_in: u128,
    /// Exact output in destination base units
    pub amount_out: u128,
    pub expected_result: f64,
    /// `None` when no slippage could be derived and the previous value was kept
    pub expected_slippage: Option<f64>,
    /// Output floor in destination base units given the current tolerance
    pub minimum_received: u128,
}

/// Request to start a recurring conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalConversionRequest {
    pub source: ConversionAccount,
    pub destination: ConversionAccount,
    pub amount: String,
    pub max_slippage_bps: u32,
    pub transaction_count: u32,
    pub interval_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalConversionStatus {
    Active,
    Completed,
    Cancelled,
    Failed,
}

/// A recurring conversion job as reported by the transaction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalConversion {
    pub id: String,
    pub source_address: String,
    pub destination_address: String,
    pub amount: String,
    pub max_slippage_bps: u32,
    pub transaction_count: u32,
    pub completed_count: u32,
    pub interval_minutes: u32,
    pub status: IntervalConversionStatus,
}

/// Configuration for the `ConvertSdk`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint used when no chain client is injected
    pub chain_rpc_url: Option<String>,
    pub rpc_max_retries: usize,
    pub default_max_slippage_bps: u32,
    /// Delay after a successful conversion before the selection is cleared
    pub reset_delay_ms: u64,
    pub interval_defaults: IntervalSettings,
}

impl Default for Config {
    fn default() -> Self {
        crate::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utxo() -> ConversionAccount {
        UtxoAccount {
            address: "0x0080aa".to_string(),
            label: None,
        }
        .into()
    }

    fn ledger() -> ConversionAccount {
        LedgerAccountTotal {
            address: "0x0010bb".to_string(),
            label: Some("Main".to_string()),
        }
        .into()
    }

    #[test]
    fn test_direction_agrees_for_every_pair() {
        let candidates = [None, Some(utxo()), Some(ledger())];
        for source in &candidates {
            for destination in &candidates {
                let quoted = ConversionDirection::for_quote(source.as_ref());
                if let Some(paired) =
                    ConversionDirection::for_pair(source.as_ref(), destination.as_ref())
                {
                    assert_eq!(paired, quoted, "{source:?} -> {destination:?}");
                }
            }
        }
    }

    #[test]
    fn test_direction_for_pair() {
        assert_eq!(
            ConversionDirection::for_pair(Some(&utxo()), Some(&ledger())),
            Some(ConversionDirection::UtxoToLedger)
        );
        assert_eq!(
            ConversionDirection::for_pair(Some(&ledger()), Some(&utxo())),
            Some(ConversionDirection::LedgerToUtxo)
        );
        assert_eq!(
            ConversionDirection::for_pair(Some(&utxo()), Some(&utxo())),
            None
        );
        assert_eq!(
            ConversionDirection::for_pair(Some(&ledger()), Some(&ledger())),
            None
        );
        assert_eq!(ConversionDirection::for_pair(None, Some(&ledger())), None);
    }

    #[test]
    fn test_quote_direction_defaults_to_ledger_source() {
        assert_eq!(
            ConversionDirection::for_quote(None),
            ConversionDirection::LedgerToUtxo
        );
        assert_eq!(
            ConversionDirection::for_quote(Some(&utxo())),
            ConversionDirection::UtxoToLedger
        );
    }

    #[test]
    fn test_currency_addresses_follow_direction() {
        assert_eq!(
            ConversionDirection::UtxoToLedger.currency_addresses(),
            (UTXO_CURRENCY_ADDRESS, LEDGER_CURRENCY_ADDRESS)
        );
        assert_eq!(
            ConversionDirection::LedgerToUtxo.currency_addresses(),
            (LEDGER_CURRENCY_ADDRESS, UTXO_CURRENCY_ADDRESS)
        );
    }

    #[test]
    fn test_interval_settings_merge_is_partial() {
        let mut settings = IntervalSettings::default();
        settings.merge(IntervalSettingsUpdate {
            enabled: Some(true),
            ..Default::default()
        });
        assert_eq!(
            settings,
            IntervalSettings {
                enabled: true,
                transaction_count: 10,
                interval_minutes: 1,
            }
        );
        settings.merge(IntervalSettingsUpdate {
            interval_minutes: Some(15),
            ..Default::default()
        });
        assert!(settings.enabled);
        assert_eq!(settings.interval_minutes, 15);
    }

    #[test]
    fn test_current_rate_follows_quote_direction() {
        let mut state = ConversionState {
            source: Some(utxo()),
            rate: 2.0,
            ..Default::default()
        };
        assert_eq!(state.current_rate(), None);

        state.rate_direction = Some(ConversionDirection::UtxoToLedger);
        assert_eq!(state.current_rate(), Some(2.0));

        state.source = Some(ledger());
        assert_eq!(state.current_rate(), None);
    }

    #[test]
    fn test_account_serializes_with_variant_tag() {
        let json = serde_json::to_value(utxo()).unwrap();
        assert_eq!(json["type"], "utxo");
        assert_eq!(json["address"], "0x0080aa");
    }
}
