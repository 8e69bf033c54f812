//! Currency rendering and the matching parser.

use anyhow::ensure;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Number of decimal places a rendered amount carries.
pub const CURRENCY_PRECISION: u32 = 2;

/// Renders a numeric amount as a currency string and reads such a string back.
///
/// Implementations must round-trip: `parse(format(v))` equals `v` rounded to
/// `CURRENCY_PRECISION` places.
pub trait CurrencyFormatter {
    fn format(&self, value: Decimal) -> String;
    fn parse(&self, s: &str) -> Result<Decimal, CurrencyError>;
}

/// An error returned when a string is not a currency amount in the expected format.
#[derive(Clone, PartialEq, Eq)]
pub struct CurrencyError(String);

impl Debug for CurrencyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for CurrencyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a currency amount", self.0)
    }
}

impl std::error::Error for CurrencyError {}

/// Describes how currency amounts are written.
///
/// # Examples
///  - symbol `R$`, grouping `,`, decimal `.` -> `-R$1,234.50`
///  - symbol `R$ `, grouping `.`, decimal `,` -> `-R$ 1.234,50`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    symbol: String,
    grouping_separator: char,
    decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: String::from("R$"),
            grouping_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl CurrencyFormat {
    /// Creates a format, rejecting separator choices that would make parsing ambiguous.
    pub fn new(
        symbol: impl Into<String>,
        grouping_separator: char,
        decimal_separator: char,
    ) -> crate::Result<Self> {
        let format = Self {
            symbol: symbol.into(),
            grouping_separator,
            decimal_separator,
        };
        format.validate()?;
        Ok(format)
    }

    /// The Brazilian convention: `R$ 1.234,50`.
    pub fn brazilian() -> Self {
        Self {
            symbol: String::from("R$ "),
            grouping_separator: '.',
            decimal_separator: ',',
        }
    }

    /// Checks that the separators are distinct and cannot be confused with digits or signs.
    pub fn validate(&self) -> crate::Result<()> {
        ensure!(
            self.grouping_separator != self.decimal_separator,
            "The grouping and decimal separators must differ, both are '{}'",
            self.decimal_separator
        );
        for c in [self.grouping_separator, self.decimal_separator] {
            ensure!(
                !c.is_ascii_digit() && c != '-',
                "'{c}' cannot be used as a currency separator"
            );
        }
        ensure!(
            !self.symbol.chars().any(|c| c.is_ascii_digit()),
            "The currency symbol '{}' cannot contain digits",
            self.symbol
        );
        Ok(())
    }
}

/// Rounds half away from zero to `CURRENCY_PRECISION` places.
fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

impl CurrencyFormatter for CurrencyFormat {
    fn format(&self, value: Decimal) -> String {
        let mut rounded = round(value);
        rounded.rescale(CURRENCY_PRECISION);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let digits = rounded.abs().to_string();
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (ix, c) in int_part.chars().enumerate() {
            if ix > 0 && (int_part.len() - ix) % 3 == 0 {
                grouped.push(self.grouping_separator);
            }
            grouped.push(c);
        }

        format!(
            "{sign}{}{grouped}{}{frac_part}",
            self.symbol, self.decimal_separator
        )
    }

    fn parse(&self, s: &str) -> Result<Decimal, CurrencyError> {
        let err = || CurrencyError(s.to_string());
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(after_minus) => (true, after_minus),
            None => (false, trimmed),
        };

        // The symbol is optional so that bare numbers are accepted too
        let symbol = self.symbol.trim();
        let rest = if symbol.is_empty() {
            rest
        } else {
            rest.strip_prefix(symbol).unwrap_or(rest)
        };
        let rest = rest.trim_start();
        if rest.is_empty() || rest.starts_with('-') {
            return Err(err());
        }

        let canonical: String = rest
            .chars()
            .filter(|c| *c != self.grouping_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();
        let value = Decimal::from_str(&canonical).map_err(|_| err())?;
        Ok(if negative { -value } else { value })
    }
}
