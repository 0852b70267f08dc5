use serde::{Deserialize, Serialize};

use crate::error::AmountError;

/// Basis points in one whole (100%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// The two denominations a conversion moves value between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Denomination {
    /// The UTXO currency, tracked as a set of unspent outputs.
    Utxo,
    /// The ledger currency, tracked as a single running account total.
    Ledger,
}

impl Denomination {
    /// Number of fraction digits between a whole unit and a base unit.
    pub const fn decimals(self) -> u32 {
        match self {
            Denomination::Utxo => 3,
            Denomination::Ledger => 18,
        }
    }

    /// Base units in one whole unit.
    pub const fn scale(self) -> u128 {
        10u128.pow(self.decimals())
    }

    /// Base units of exactly one whole unit, as used when quoting a unit rate.
    pub const fn one(self) -> u128 {
        self.scale()
    }
}

/// Parses a decimal amount string into integer base units of `denomination`.
///
/// Accepts an optional leading `+`, surrounding whitespace and a single `.`.
/// Trailing fraction zeros beyond the denomination's precision are ignored.
pub fn parse_units(input: &str, denomination: Denomination) -> Result<u128, AmountError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(AmountError::InvalidNumber(input.to_string()));
    }

    let decimals = denomination.decimals();
    let fraction = fraction.trim_end_matches('0');
    let fraction_len = u32::try_from(fraction.len()).map_err(|_| AmountError::Overflow)?;
    if fraction_len > decimals {
        return Err(AmountError::TooManyDecimals {
            decimals: fraction_len,
            max: decimals,
        });
    }

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| AmountError::Overflow)?
    };
    let fraction_units = if fraction.is_empty() {
        0
    } else {
        let padding = 10u128.pow(decimals.saturating_sub(fraction_len));
        fraction
            .parse::<u128>()
            .map_err(|_| AmountError::Overflow)?
            .checked_mul(padding)
            .ok_or(AmountError::Overflow)?
    };

    whole_units
        .checked_mul(denomination.scale())
        .and_then(|units| units.checked_add(fraction_units))
        .ok_or(AmountError::Overflow)
}

/// Same as [`parse_units`], but an unset or unparsable amount counts as zero.
pub fn parse_units_or_zero(input: &str, denomination: Denomination) -> u128 {
    parse_units(input, denomination).unwrap_or(0)
}

/// Formats base units as a decimal string in `denomination`.
///
/// The result always carries at least one fraction digit (`"1.0"`) and never
/// trailing zeros beyond that.
pub fn format_units(units: u128, denomination: Denomination) -> String {
    let scale = denomination.scale();
    let whole = units.checked_div(scale).unwrap_or_default();
    let fraction = units.checked_rem(scale).unwrap_or_default();
    let width = denomination.decimals() as usize;
    let fraction = format!("{fraction:0width$}");
    let fraction = match fraction.trim_end_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    format!("{whole}.{fraction}")
}

/// Converts base units into a display scalar in `denomination`.
pub fn units_to_f64(units: u128, denomination: Denomination) -> f64 {
    format_units(units, denomination)
        .parse::<f64>()
        .unwrap_or_default()
}

/// Reads a user-entered amount as a plain number; unset or invalid input is zero.
pub fn amount_to_f64(amount: &str) -> f64 {
    amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or_default()
}

/// Signed fractional deviation of `expected` from the linear projection `rate * amount`.
///
/// Returns `None` when either the rate or the amount is zero, since no projection exists.
pub fn linear_slippage(rate: f64, amount: f64, expected: f64) -> Option<f64> {
    if rate == 0.0 || amount == 0.0 {
        return None;
    }
    let projection = rate * amount;
    Some((projection - expected) / projection)
}

/// Lowest output still inside the `max_slippage_bps` tolerance of `expected`.
pub fn minimum_received(expected: u128, max_slippage_bps: u32) -> u128 {
    expected
        .saturating_mul(u128::from(BPS_DENOMINATOR.saturating_sub(max_slippage_bps)))
        .saturating_div(u128::from(BPS_DENOMINATOR))
}
