//! Exact monetary amounts.
//!
//! `Amount` wraps a `Decimal` so that sums and comparisons never pick up
//! binary floating point drift. Amounts are persisted as an integer count of
//! minor units (hundredths), which is why at most two fractional digits are
//! accepted by the store.

use std::fmt::{self, Display, Formatter};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TallyError};

/// Number of fractional digits kept for stored amounts.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// A monetary quantity.
///
/// Equality is numeric: `12.5` and `12.50` are the same amount.
///
/// ```
/// # use tally_core::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("12.5").unwrap();
/// assert_eq!(amount.to_string(), "12.50");
/// assert_eq!(amount.to_minor().unwrap(), 1250);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Build an amount from an integer count of minor units (e.g. cents).
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, MINOR_UNIT_SCALE))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_negative()
    }

    /// Convert to an integer count of minor units.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::Validation` if the value has more than two
    /// significant fractional digits or does not fit in an `i64`.
    pub fn to_minor(&self) -> Result<i64> {
        let normalized = self.0.normalize();
        if normalized.scale() > MINOR_UNIT_SCALE {
            return Err(TallyError::Validation(format!(
                "Amount {} has more than {} decimal places",
                self.0, MINOR_UNIT_SCALE
            )));
        }
        let mut scaled = normalized;
        scaled.rescale(MINOR_UNIT_SCALE);
        i64::try_from(scaled.mantissa())
            .map_err(|_| TallyError::Validation(format!("Amount {} is too large", self.0)))
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Display for Amount {
    /// Fixed-point text with two fractional digits (`12.50`). Values carrying
    /// more precision are shown as-is rather than rounded.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        if value.scale() <= MINOR_UNIT_SCALE {
            value.rescale(MINOR_UNIT_SCALE);
        }
        Display::fmt(&value, f)
    }
}

impl FromStr for Amount {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TallyError::Validation("Amount is required".to_string()));
        }
        Decimal::from_str(trimmed)
            .map(Amount)
            .map_err(|_| {
                TallyError::Validation(format!(
                    "Invalid amount \"{}\" (use numbers like 250.50)",
                    trimmed
                ))
            })
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
