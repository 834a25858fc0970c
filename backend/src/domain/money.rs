//! Monetary amounts in integer centavos.
//!
//! Prices and payments travel as decimal strings on the wire (`"200.00"`)
//! and are held as whole centavos internally, so no floating point ever
//! touches a ledger sum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when parsing or combining monetary amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Input was empty or not a decimal number.
    #[error("amount must be a decimal number, got {value:?}")]
    Malformed {
        /// The rejected input.
        value: String,
    },
    /// More than two fractional digits were supplied.
    #[error("amount supports at most two decimal places, got {value:?}")]
    TooPrecise {
        /// The rejected input.
        value: String,
    },
    /// Negative amounts are never valid in this domain.
    #[error("amount must not be negative, got {value:?}")]
    Negative {
        /// The rejected input.
        value: String,
    },
    /// A ledger sum exceeded the representable range.
    #[error("amount arithmetic overflowed")]
    Overflow,
}

/// A non-negative monetary amount in whole centavos.
///
/// Ordering and equality follow the numeric value, so `"200"` and `"200.00"`
/// parse to equal amounts.
///
/// # Examples
/// ```
/// use backend::domain::Money;
///
/// let price: Money = "200.00".parse().expect("valid amount");
/// assert_eq!(price.to_string(), "200.00");
/// assert_eq!(price.centavos(), 20_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money(i64);

impl Money {
    /// Zero centavos.
    pub const ZERO: Self = Self(0);

    /// Construct from whole centavos, rejecting negative values.
    pub fn from_centavos(centavos: i64) -> Result<Self, MoneyError> {
        if centavos < 0 {
            return Err(MoneyError::Negative {
                value: centavos.to_string(),
            });
        }
        Ok(Self(centavos))
    }

    /// The amount in whole centavos.
    #[must_use]
    pub const fn centavos(self) -> i64 {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Overflow-checked addition.
    pub const fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        match self.0.checked_add(other.0) {
            Some(sum) => Ok(Self(sum)),
            None => Err(MoneyError::Overflow),
        }
    }

    /// Sum an iterator of amounts, failing on overflow.
    pub fn sum(amounts: impl IntoIterator<Item = Self>) -> Result<Self, MoneyError> {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, Self::checked_add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let cents = self.0 % 100;
        write!(f, "{whole}.{cents:02}")
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let malformed = || MoneyError::Malformed {
            value: input.to_owned(),
        };

        if trimmed.starts_with('-') {
            return Err(MoneyError::Negative {
                value: input.to_owned(),
            });
        }

        let (whole_part, frac_part) = match trimmed.split_once('.') {
            Some((whole, frac)) => (whole, Some(frac)),
            None => (trimmed, None),
        };

        if whole_part.is_empty() || !whole_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let whole: i64 = whole_part.parse().map_err(|_| malformed())?;

        let cents: i64 = match frac_part {
            None => 0,
            Some(frac) => {
                if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed());
                }
                if frac.len() > 2 {
                    return Err(MoneyError::TooPrecise {
                        value: input.to_owned(),
                    });
                }
                let parsed: i64 = frac.parse().map_err(|_| malformed())?;
                if frac.len() == 1 { parsed * 10 } else { parsed }
            }
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }
}

impl TryFrom<String> for Money {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Money> for String {
    fn from(value: Money) -> Self {
        value.to_string()
    }
}
