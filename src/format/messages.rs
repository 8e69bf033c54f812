//! Sentences describing when activity happened, in the user's language.

use crate::model::BucketKind;
use chrono::{DateTime, FixedOffset, Locale as ChronoLocale, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Renders dates and activity sentences for the dashboard.
pub trait ActivityFormatter {
    /// The sentence naming the most recent date of a non-empty bucket.
    fn last_activity(&self, kind: BucketKind, date: DateTime<Utc>) -> String;

    /// The fixed sentence for a bucket without any transactions.
    fn no_activity(&self, kind: BucketKind) -> String;

    /// The sentence describing the span from the first to the last transaction.
    fn interval(&self, first: DateTime<Utc>, last: DateTime<Utc>) -> String;

    /// A compact date for a single transaction row.
    fn short_date(&self, date: DateTime<Utc>) -> String;

    /// The heading above the transaction list.
    fn transactions_title(&self, has_transactions: bool) -> String;
}

/// The languages the messages are available in.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "pt-br")]
    Portuguese,
}

serde_plain::derive_display_from_serialize!(Language);
serde_plain::derive_fromstr_from_deserialize!(Language);

/// Activity messages in a given language, with dates shown at a fixed UTC offset.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Messages {
    language: Language,
    offset: FixedOffset,
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(Language::default(), utc())
    }
}

impl Messages {
    pub fn new(language: Language, offset: FixedOffset) -> Self {
        Self { language, offset }
    }

    fn local(&self, date: DateTime<Utc>) -> DateTime<FixedOffset> {
        date.with_timezone(&self.offset)
    }

    /// Day and month, e.g. `10 January` or `10 de janeiro`.
    fn day_month(&self, date: DateTime<Utc>) -> String {
        let local = self.local(date);
        match self.language {
            Language::English => local.format("%d %B").to_string(),
            Language::Portuguese => local
                .format_localized("%d de %B", ChronoLocale::pt_BR)
                .to_string(),
        }
    }

    fn day_of_month(&self, date: DateTime<Utc>) -> String {
        let local = self.local(date);
        match self.language {
            Language::English => local.format("%d of %B").to_string(),
            Language::Portuguese => local
                .format_localized("%d de %B", ChronoLocale::pt_BR)
                .to_string(),
        }
    }
}

impl ActivityFormatter for Messages {
    fn last_activity(&self, kind: BucketKind, date: DateTime<Utc>) -> String {
        let when = self.day_of_month(date);
        match (self.language, kind) {
            (Language::English, BucketKind::Entries) => format!("Last entry on day {when}"),
            (Language::English, BucketKind::Expensives) => format!("Last exit on day {when}"),
            (Language::English, BucketKind::Total) => format!("Last transaction on day {when}"),
            (Language::Portuguese, BucketKind::Entries) => format!("Última entrada dia {when}"),
            (Language::Portuguese, BucketKind::Expensives) => format!("Última saída dia {when}"),
            (Language::Portuguese, BucketKind::Total) => format!("Última transação dia {when}"),
        }
    }

    fn no_activity(&self, kind: BucketKind) -> String {
        let s = match (self.language, kind) {
            (Language::English, BucketKind::Entries) => "No recent entries",
            (Language::English, BucketKind::Expensives) => "No recent exits",
            (Language::English, BucketKind::Total) => "No recent transactions",
            (Language::Portuguese, BucketKind::Entries) => "Sem entradas recentes",
            (Language::Portuguese, BucketKind::Expensives) => "Sem saídas recentes",
            (Language::Portuguese, BucketKind::Total) => "Sem transações recentes",
        };
        s.to_string()
    }

    fn interval(&self, first: DateTime<Utc>, last: DateTime<Utc>) -> String {
        let same_day = self.local(first).date_naive() == self.local(last).date_naive();
        let from = self.day_month(first);
        match (self.language, same_day) {
            (Language::English, true) => format!("On {from}"),
            (Language::Portuguese, true) => format!("Dia {from}"),
            (Language::English, false) => format!("From {from} to {}", self.day_month(last)),
            (Language::Portuguese, false) => format!("{from} a {}", self.day_month(last)),
        }
    }

    fn short_date(&self, date: DateTime<Utc>) -> String {
        let local = self.local(date);
        match self.language {
            Language::English => local.format("%m/%d/%y").to_string(),
            Language::Portuguese => local.format("%d/%m/%y").to_string(),
        }
    }

    fn transactions_title(&self, has_transactions: bool) -> String {
        let s = match (self.language, has_transactions) {
            (Language::English, true) => "Transaction history",
            (Language::English, false) => "No recent transactions.",
            (Language::Portuguese, true) => "Histórico de transações",
            (Language::Portuguese, false) => "Não há transações recentes.",
        };
        s.to_string()
    }
}

/// Builds a display offset from a number of minutes east of UTC. Returns `None` when the offset is
/// a day or more.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}

fn utc() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn portuguese() -> Messages {
        Messages::new(Language::Portuguese, utc())
    }

    #[test]
    fn test_last_activity_english() {
        let m = Messages::default();
        assert_eq!(
            m.last_activity(BucketKind::Entries, at(2023, 1, 10, 12)),
            "Last entry on day 10 of January"
        );
        assert_eq!(
            m.last_activity(BucketKind::Expensives, at(2023, 1, 5, 12)),
            "Last exit on day 05 of January"
        );
    }

    #[test]
    fn test_last_activity_portuguese() {
        let m = portuguese();
        assert_eq!(
            m.last_activity(BucketKind::Entries, at(2023, 1, 10, 12)),
            "Última entrada dia 10 de janeiro"
        );
        assert_eq!(
            m.last_activity(BucketKind::Expensives, at(2023, 3, 15, 12)),
            "Última saída dia 15 de março"
        );
    }

    #[test]
    fn test_no_activity() {
        let m = Messages::default();
        assert_eq!(m.no_activity(BucketKind::Entries), "No recent entries");
        assert_eq!(m.no_activity(BucketKind::Expensives), "No recent exits");
        assert_eq!(m.no_activity(BucketKind::Total), "No recent transactions");
        let m = portuguese();
        assert_eq!(m.no_activity(BucketKind::Total), "Sem transações recentes");
    }

    #[test]
    fn test_interval() {
        let m = Messages::default();
        assert_eq!(
            m.interval(at(2023, 1, 10, 8), at(2023, 1, 15, 20)),
            "From 10 January to 15 January"
        );
        assert_eq!(
            portuguese().interval(at(2023, 1, 10, 8), at(2023, 2, 1, 20)),
            "10 de janeiro a 01 de fevereiro"
        );
    }

    #[test]
    fn test_interval_single_day() {
        let m = Messages::default();
        assert_eq!(m.interval(at(2023, 1, 10, 8), at(2023, 1, 10, 8)), "On 10 January");
        assert_eq!(
            m.interval(at(2023, 1, 10, 1), at(2023, 1, 10, 23)),
            "On 10 January"
        );
        assert_eq!(
            portuguese().interval(at(2023, 1, 10, 8), at(2023, 1, 10, 8)),
            "Dia 10 de janeiro"
        );
    }

    #[test]
    fn test_offset_shifts_day() {
        let brasilia = offset_from_minutes(-180).unwrap();
        let m = Messages::new(Language::English, brasilia);
        // 02:00 UTC on the 11th is still the 10th in Brasília
        assert_eq!(
            m.last_activity(BucketKind::Entries, at(2023, 1, 11, 2)),
            "Last entry on day 10 of January"
        );
        assert_eq!(m.short_date(at(2023, 1, 11, 2)), "01/10/23");
    }

    #[test]
    fn test_offset_from_minutes_bounds() {
        assert!(offset_from_minutes(0).is_some());
        assert!(offset_from_minutes(-180).is_some());
        assert!(offset_from_minutes(24 * 60).is_none());
        assert!(offset_from_minutes(i32::MAX).is_none());
    }

    #[test]
    fn test_short_date() {
        assert_eq!(Messages::default().short_date(at(2023, 1, 15, 0)), "01/15/23");
        assert_eq!(portuguese().short_date(at(2023, 1, 15, 0)), "15/01/23");
    }

    #[test]
    fn test_transactions_title() {
        assert_eq!(
            Messages::default().transactions_title(false),
            "No recent transactions."
        );
        assert_eq!(portuguese().transactions_title(true), "Histórico de transações");
    }

    #[test]
    fn test_language_strings() {
        assert_eq!(Language::Portuguese.to_string(), "pt-br");
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
    }
}
