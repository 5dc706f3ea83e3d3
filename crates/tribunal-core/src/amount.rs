//! # Amount — Fixed-Point Money
//!
//! A non-negative, decimal-precise amount with four fractional digits,
//! stored as an integer count of base units (`1 == 10_000` units).
//!
//! ## Design
//!
//! Floats never touch money. Amounts parse from and serialize to decimal
//! strings; all arithmetic is integer arithmetic. Division (percentage
//! cuts, even splits) floors toward zero — the remainder is retained by
//! the caller's pool rather than invented or lost to rounding error.
//!
//! Negativity is unrepresentable: subtraction saturates at zero, which is
//! exactly the stake-floor rule the settlement engine needs.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Base units per whole amount (four fractional decimal digits).
const UNITS_PER_WHOLE: u128 = 10_000;

/// A non-negative fixed-point amount with four fractional decimal digits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Construct from a raw count of base units (1/10_000ths).
    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    /// Construct from a whole number of currency units.
    pub const fn from_whole(whole: u64) -> Self {
        Self(whole as u128 * UNITS_PER_WHOLE)
    }

    /// The raw count of base units.
    pub const fn units(&self) -> u128 {
        self.0
    }

    /// Whether this amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Subtraction floored at zero.
    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    /// Take `percent` of this amount, flooring to base units.
    ///
    /// `percent` above 100 is accepted (the caller validates policy
    /// bounds); the arithmetic itself is well-defined for any `u8`.
    pub fn percent(self, percent: u8) -> Amount {
        Amount(self.0 * u128::from(percent) / 100)
    }

    /// Divide evenly among `n` recipients, flooring to base units.
    ///
    /// Returns zero when `n == 0`.
    pub fn split_evenly(self, n: usize) -> Amount {
        if n == 0 {
            return Amount::ZERO;
        }
        Amount(self.0 / n as u128)
    }

    /// Sum an iterator of amounts, returning `None` on overflow.
    pub fn checked_sum<I: IntoIterator<Item = Amount>>(amounts: I) -> Option<Amount> {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, a| acc.checked_add(a))
    }
}

impl std::str::FromStr for Amount {
    type Err = CoreError;

    /// Parse a non-negative decimal string with at most four fractional
    /// digits (e.g. `"100"`, `"10.5"`, `"0.0001"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let reject = |reason: &str| CoreError::InvalidAmount {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (s, None),
        };

        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(reject("expected a non-negative decimal number"));
        }
        let whole: u128 = int_part
            .parse()
            .map_err(|_| reject("integer part out of range"))?;

        let frac_units = match frac_part {
            None => 0,
            Some(f) => {
                if f.is_empty() || f.len() > 4 || !f.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(reject("at most four fractional digits are supported"));
                }
                let scale = 10u128.pow(4 - f.len() as u32);
                let digits: u128 = f.parse().map_err(|_| reject("bad fractional part"))?;
                digits * scale
            }
        };

        whole
            .checked_mul(UNITS_PER_WHOLE)
            .and_then(|u| u.checked_add(frac_units))
            .map(Amount)
            .ok_or_else(|| reject("amount out of range"))
    }
}

impl TryFrom<String> for Amount {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Amount {
    /// Renders as a decimal string with trailing fractional zeros trimmed
    /// (`"100"`, `"10.5"`, `"0.0001"`).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / UNITS_PER_WHOLE;
        let frac = self.0 % UNITS_PER_WHOLE;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let frac = format!("{frac:04}");
        write!(f, "{whole}.{}", frac.trim_end_matches('0'))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
