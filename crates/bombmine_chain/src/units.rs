//! # Amount Units
//!
//! Wei-precision helpers. All amounts are `U256` holding base units
//! (10^18 per whole token or ether), never floating point.

use alloy_primitives::U256;

use crate::error::{LedgerError, LedgerResult};

/// Number of decimal places of ether and Bombcoin.
pub const DECIMALS: usize = 18;

/// Base units in one whole ether / token.
pub const WEI_PER_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Basis points in 100%.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Parses a decimal ether string (`"0.005"`, `"100"`, `".5"`) into wei.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidAmount`] for anything that is not a plain
/// non-negative decimal with at most 18 fractional digits.
pub fn parse_ether(raw: &str) -> LedgerResult<U256> {
    let raw = raw.trim();
    let invalid = || LedgerError::InvalidAmount(raw.to_string());

    let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty())
        || frac.len() > DECIMALS
        || !is_digits(whole)
        || !is_digits(frac)
    {
        return Err(invalid());
    }

    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        whole.parse::<U256>().map_err(|_| invalid())?
    };
    let frac = if frac.is_empty() {
        U256::ZERO
    } else {
        format!("{:0<width$}", frac, width = DECIMALS)
            .parse::<U256>()
            .map_err(|_| invalid())?
    };

    whole
        .checked_mul(WEI_PER_ETHER)
        .and_then(|w| w.checked_add(frac))
        .ok_or(LedgerError::Overflow)
}

/// Formats wei as a decimal ether string without trailing zeros.
#[must_use]
pub fn format_ether(amount: U256) -> String {
    let whole = amount / WEI_PER_ETHER;
    // Always below 10^18, so it fits.
    let frac = u64::try_from(amount % WEI_PER_ETHER).unwrap_or_default();
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0>width$}", frac, width = DECIMALS);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Returns `bps / 10_000` of `amount`, rounded down, without overflow.
#[must_use]
pub fn bps_of(amount: U256, bps: u16) -> U256 {
    let denom = U256::from(BPS_DENOMINATOR);
    let bps = U256::from(bps);
    (amount / denom) * bps + (amount % denom) * bps / denom
}

/// Serde adapter for ether amounts in config files.
///
/// Accepts a decimal ether string (`price = "0.005"`), a raw wei integer
/// (`price = 5000000000000000`) or a hex wei string for amounts past
/// `u64` (`price = "0x3635c9adc5dea00000"`). Serializes as an ether string.
pub mod serde_ether {
    use alloy_primitives::U256;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes wei as a decimal ether string.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_ether(*value))
    }

    /// Deserializes an ether string, a `0x` wei string or a wei integer.
    ///
    /// # Errors
    ///
    /// Fails on malformed amount strings.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum AmountInput {
            Ether(String),
            Wei(u64),
        }

        match AmountInput::deserialize(deserializer)? {
            AmountInput::Ether(raw) => match raw.trim().strip_prefix("0x") {
                Some(hex) if !hex.is_empty() => U256::from_str_radix(hex, 16)
                    .map_err(|_| D::Error::custom(format!("invalid wei amount: {raw}"))),
                _ => super::parse_ether(&raw).map_err(D::Error::custom),
            },
            AmountInput::Wei(wei) => Ok(U256::from(wei)),
        }
    }
}
