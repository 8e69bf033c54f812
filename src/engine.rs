//! The aggregation engine: turns validated transactions into dashboard highlights and display
//! records.
//!
//! Everything here is a pure function of its inputs. Nothing is read from or written to storage,
//! and the input slice is never modified.

use crate::format::{ActivityFormatter, CurrencyFormatter};
use crate::model::{
    BucketKind, DisplayTransaction, Highlight, HighlightData, Transaction, TransactionType,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;

/// Running sum and latest date of one partition.
#[derive(Debug, Default, Clone, Copy)]
struct Partition {
    sum: Decimal,
    last: Option<DateTime<Utc>>,
}

impl Partition {
    /// Adds `t` unless its amount would overflow the sum, in which case the partition is left as
    /// it was and `false` is returned.
    fn add(&mut self, t: &Transaction) -> bool {
        let Some(sum) = self.sum.checked_add(t.amount().value()) else {
            return false;
        };
        self.sum = sum;
        self.last = Some(self.last.map_or(t.date(), |last| last.max(t.date())));
        true
    }
}

/// Computes the entries, expensives and total highlights for a collection of transactions.
///
/// Buckets are decided by transaction type alone. The total is the entries sum minus the
/// expensives sum, both taken from the numeric amounts, and its message spans the earliest to the
/// latest transaction of the whole collection. Empty buckets get the formatter's fixed
/// no-activity sentence.
///
/// A transaction that would overflow its bucket's sum is left out entirely. `model::normalize`
/// already reports and removes such records, so this only happens for input built elsewhere.
pub fn compute_highlights<F>(transactions: &[Transaction], formatter: &F) -> HighlightData
where
    F: CurrencyFormatter + ActivityFormatter + ?Sized,
{
    let mut entries = Partition::default();
    let mut expensives = Partition::default();
    let mut span: Option<(DateTime<Utc>, DateTime<Utc>)> = None;

    for t in transactions {
        let added = match t.kind() {
            TransactionType::Positive => entries.add(t),
            TransactionType::Negative => expensives.add(t),
        };
        if !added {
            warn!("Leaving out transaction '{}', its amount overflows the sum", t.id());
            continue;
        }
        let date = t.date();
        span = Some(match span {
            Some((first, last)) => (first.min(date), last.max(date)),
            None => (date, date),
        });
    }

    let total = entries.sum - expensives.sum;
    let total_message = match span {
        Some((first, last)) => formatter.interval(first, last),
        None => formatter.no_activity(BucketKind::Total),
    };

    HighlightData {
        entries: highlight(BucketKind::Entries, &entries, formatter),
        expensives: highlight(BucketKind::Expensives, &expensives, formatter),
        total: Highlight {
            amount: formatter.format(total),
            last_transaction: total_message,
            value: total,
        },
    }
}

fn highlight<F>(kind: BucketKind, partition: &Partition, formatter: &F) -> Highlight
where
    F: CurrencyFormatter + ActivityFormatter + ?Sized,
{
    let last_transaction = match partition.last {
        Some(date) => formatter.last_activity(kind, date),
        None => formatter.no_activity(kind),
    };
    Highlight {
        amount: formatter.format(partition.sum),
        last_transaction,
        value: partition.sum,
    }
}

/// Renders each transaction for display, keeping the input order. The numeric amounts in the
/// input are left as they are, so sums should always be taken from the `Transaction`s.
pub fn normalize_for_display<F>(
    transactions: &[Transaction],
    formatter: &F,
) -> Vec<DisplayTransaction>
where
    F: CurrencyFormatter + ActivityFormatter + ?Sized,
{
    transactions
        .iter()
        .map(|t| DisplayTransaction {
            id: t.id().to_string(),
            kind: t.kind(),
            amount: formatter.format(t.amount().value()),
            date: formatter.short_date(t.date()),
            other_fields: t.other_fields().clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{CurrencyFormat, Language, Locale, Messages};
    use crate::model::Amount;
    use chrono::{Offset, TimeZone};
    use serde_json::json;
    use std::str::FromStr;

    fn txn(id: &str, kind: TransactionType, amount: &str, y: i32, m: u32, d: u32) -> Transaction {
        Transaction::new(
            id,
            kind,
            Amount::from_str(amount).unwrap(),
            Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        )
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_scenario_entry_and_exit() {
        let transactions = vec![
            txn("1", TransactionType::Positive, "100.00", 2023, 1, 10),
            txn("2", TransactionType::Negative, "30.00", 2023, 1, 15),
        ];
        let data = compute_highlights(&transactions, &Locale::default());
        assert_eq!(data.entries.amount, "R$100.00");
        assert_eq!(data.expensives.amount, "R$30.00");
        assert_eq!(data.total.amount, "R$70.00");
        assert_eq!(data.total.last_transaction, "From 10 January to 15 January");
        assert_eq!(data.entries.last_transaction, "Last entry on day 10 of January");
        assert_eq!(data.expensives.last_transaction, "Last exit on day 15 of January");
    }

    #[test]
    fn test_empty_collection() {
        let data = compute_highlights(&[], &Locale::default());
        for kind in [BucketKind::Entries, BucketKind::Expensives, BucketKind::Total] {
            let h = data.get(kind);
            assert_eq!(h.value, Decimal::ZERO);
            assert_eq!(h.amount, "R$0.00");
        }
        assert_eq!(data.entries.last_transaction, "No recent entries");
        assert_eq!(data.expensives.last_transaction, "No recent exits");
        assert_eq!(data.total.last_transaction, "No recent transactions");
    }

    #[test]
    fn test_only_expenses() {
        let transactions = vec![
            txn("1", TransactionType::Negative, "10.00", 2023, 2, 1),
            txn("2", TransactionType::Negative, "5.50", 2023, 2, 3),
        ];
        let data = compute_highlights(&transactions, &Locale::default());
        assert_eq!(data.entries.last_transaction, "No recent entries");
        assert_eq!(data.entries.value, Decimal::ZERO);
        assert_eq!(data.expensives.value, dec("15.50"));
        assert_eq!(data.total.value, dec("-15.50"));
        assert_eq!(data.total.amount, "-R$15.50");
        assert_eq!(data.total.last_transaction, "From 01 February to 03 February");
    }

    #[test]
    fn test_last_activity_is_per_bucket() {
        // The expense is the most recent transaction overall, the entry is older
        let transactions = vec![
            txn("1", TransactionType::Positive, "1", 2023, 1, 3),
            txn("2", TransactionType::Negative, "1", 2023, 1, 20),
        ];
        let data = compute_highlights(&transactions, &Locale::default());
        assert_eq!(data.entries.last_transaction, "Last entry on day 03 of January");
        assert_eq!(data.expensives.last_transaction, "Last exit on day 20 of January");
    }

    #[test]
    fn test_max_date_regardless_of_order() {
        let transactions = vec![
            txn("1", TransactionType::Positive, "1", 2023, 5, 20),
            txn("2", TransactionType::Positive, "1", 2023, 5, 2),
            txn("3", TransactionType::Positive, "1", 2023, 5, 9),
        ];
        let data = compute_highlights(&transactions, &Locale::default());
        assert_eq!(data.entries.last_transaction, "Last entry on day 20 of May");
        assert_eq!(data.total.last_transaction, "From 02 May to 20 May");
    }

    #[test]
    fn test_single_transaction_interval() {
        let transactions = vec![txn("1", TransactionType::Positive, "9.99", 2023, 7, 4)];
        let data = compute_highlights(&transactions, &Locale::default());
        assert_eq!(data.total.last_transaction, "On 04 July");
        assert_eq!(data.expensives.last_transaction, "No recent exits");
    }

    #[test]
    fn test_total_is_exact_difference() {
        let transactions = vec![
            txn("1", TransactionType::Positive, "0.1", 2023, 1, 1),
            txn("2", TransactionType::Positive, "0.2", 2023, 1, 2),
            txn("3", TransactionType::Negative, "0.3", 2023, 1, 3),
            txn("4", TransactionType::Positive, "1234567.891", 2023, 1, 4),
            txn("5", TransactionType::Negative, "0.001", 2023, 1, 5),
        ];
        let data = compute_highlights(&transactions, &Locale::default());
        assert_eq!(data.entries.value, dec("1234568.191"));
        assert_eq!(data.expensives.value, dec("0.301"));
        assert_eq!(data.total.value, data.entries.value - data.expensives.value);
        assert_eq!(data.total.value, dec("1234567.890"));
        assert_eq!(data.total.amount, "R$1,234,567.89");
    }

    #[test]
    fn test_overflowing_amount_is_left_out() {
        let max = Decimal::MAX.to_string();
        let transactions = vec![
            txn("1", TransactionType::Positive, &max, 2023, 1, 10),
            txn("2", TransactionType::Positive, &max, 2023, 1, 20),
            txn("3", TransactionType::Negative, "1", 2023, 1, 15),
        ];
        let data = compute_highlights(&transactions, &Locale::default());
        assert_eq!(data.entries.value, Decimal::MAX);
        assert_eq!(data.entries.last_transaction, "Last entry on day 10 of January");
        assert_eq!(data.total.value, Decimal::MAX - Decimal::ONE);
        assert_eq!(data.total.last_transaction, "From 10 January to 15 January");
    }

    #[test]
    fn test_input_is_not_modified() {
        let transactions = vec![
            txn("1", TransactionType::Positive, "100.00", 2023, 1, 10),
            txn("2", TransactionType::Negative, "30.00", 2023, 1, 15),
        ];
        let before = transactions.clone();
        let _ = compute_highlights(&transactions, &Locale::default());
        let _ = normalize_for_display(&transactions, &Locale::default());
        assert_eq!(before, transactions);
    }

    #[test]
    fn test_portuguese_locale() {
        let locale = Locale::new(
            CurrencyFormat::brazilian(),
            Messages::new(Language::Portuguese, Utc.fix()),
        );
        let transactions = vec![
            txn("1", TransactionType::Positive, "1500", 2023, 1, 10),
            txn("2", TransactionType::Negative, "30", 2023, 1, 15),
        ];
        let data = compute_highlights(&transactions, &locale);
        assert_eq!(data.entries.amount, "R$ 1.500,00");
        assert_eq!(data.total.amount, "R$ 1.470,00");
        assert_eq!(data.entries.last_transaction, "Última entrada dia 10 de janeiro");
        assert_eq!(data.total.last_transaction, "10 de janeiro a 15 de janeiro");
    }

    #[test]
    fn test_normalize_for_display() {
        let transactions = vec![
            txn("b", TransactionType::Negative, "1234.5", 2023, 1, 15).with_field("name", "Rent"),
            txn("a", TransactionType::Positive, "10", 2023, 1, 10),
        ];
        let display = normalize_for_display(&transactions, &Locale::default());
        assert_eq!(display.len(), 2);
        assert_eq!(display[0].id, "b");
        assert_eq!(display[0].kind, TransactionType::Negative);
        assert_eq!(display[0].amount, "R$1,234.50");
        assert_eq!(display[0].date, "01/15/23");
        assert_eq!(display[0].other_fields.get("name"), Some(&json!("Rent")));
        assert_eq!(display[1].id, "a");
        assert_eq!(display[1].amount, "R$10.00");
    }

    #[test]
    fn test_display_amount_parses_back_to_value() {
        let locale = Locale::default();
        let transactions = vec![txn("1", TransactionType::Positive, "98765.43", 2023, 1, 1)];
        let display = normalize_for_display(&transactions, &locale);
        let parsed = locale.parse(&display[0].amount).unwrap();
        assert_eq!(parsed, transactions[0].amount().value());
    }
}
