//! Formatting strategies used by the aggregation engine.
//!
//! The engine never formats anything itself. It is handed something that implements
//! `CurrencyFormatter` and `ActivityFormatter`, which keeps it free of locale concerns and lets
//! tests supply their own renderings.

mod currency;
mod messages;

pub use currency::{CurrencyError, CurrencyFormat, CurrencyFormatter, CURRENCY_PRECISION};
pub use messages::{offset_from_minutes, ActivityFormatter, Language, Messages};

use crate::model::BucketKind;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// The currency format and activity messages of one user-facing locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locale {
    currency: CurrencyFormat,
    messages: Messages,
}

impl Locale {
    pub fn new(currency: CurrencyFormat, messages: Messages) -> Self {
        Self { currency, messages }
    }
}

impl CurrencyFormatter for Locale {
    fn format(&self, value: Decimal) -> String {
        self.currency.format(value)
    }

    fn parse(&self, s: &str) -> Result<Decimal, CurrencyError> {
        self.currency.parse(s)
    }
}

impl ActivityFormatter for Locale {
    fn last_activity(&self, kind: BucketKind, date: DateTime<Utc>) -> String {
        self.messages.last_activity(kind, date)
    }

    fn no_activity(&self, kind: BucketKind) -> String {
        self.messages.no_activity(kind)
    }

    fn interval(&self, first: DateTime<Utc>, last: DateTime<Utc>) -> String {
        self.messages.interval(first, last)
    }

    fn short_date(&self, date: DateTime<Utc>) -> String {
        self.messages.short_date(date)
    }

    fn transactions_title(&self, has_transactions: bool) -> String {
        self.messages.transactions_title(has_transactions)
    }
}
