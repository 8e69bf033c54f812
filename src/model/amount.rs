//! Amount type for the monetary magnitude of a transaction.
//!
//! Amounts are persisted as canonical numeric strings (`"100.00"`), although older records may
//! hold bare JSON numbers. Whether a transaction adds or subtracts is decided by its type, never by
//! the sign of its amount, so an `Amount` is always a non-negative magnitude.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// A non-negative monetary magnitude.
///
/// # Examples
///
/// ```
/// # use gofinances::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("100.50").unwrap();
/// assert_eq!(amount.to_string(), "100.50");
/// assert!(Amount::from_str("-3").is_err());
/// assert!(Amount::from_str("R$3,00").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates an `Amount`, rejecting negative values.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Parses the amount field of a stored record, which may be a numeric string or a number.
    pub fn from_stored(value: &Value) -> Result<Self, AmountError> {
        match value {
            Value::String(s) => Amount::from_str(s),
            Value::Number(n) => Amount::from_str(&n.to_string()),
            other => Err(AmountError::NotNumeric(other.to_string())),
        }
    }
}

/// An error that can occur when reading a stored amount.
#[derive(Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The value is not a canonical number.
    NotNumeric(String),
    /// The value is a number, but a negative one.
    Negative(Decimal),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::NotNumeric(s) => write!(f, "'{s}' is not a numeric amount"),
            AmountError::Negative(d) => {
                write!(f, "amount {d} is negative, amounts must be non-negative magnitudes")
            }
        }
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| AmountError::NotNumeric(s.to_string()))?;
        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Persist as a numeric string
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Amount::from_stored(&value).map_err(serde::de::Error::custom)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
