use crate::model::{Amount, AmountError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Whether a transaction brings money in or takes it out.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Income, shown as an entry.
    Positive,
    /// Expense, shown as an exit.
    Negative,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// A transaction exactly as it is persisted.
///
/// The record is held as the raw JSON value so that one bad record, whatever its shape, can be
/// reported and skipped without making the whole collection unreadable, and so that writing the
/// collection back returns it byte for byte. Fields other than `id`, `type`, `amount` and `date`
/// (such as `name` and `category`) are descriptive and passed through.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredTransaction(Value);

impl StoredTransaction {
    /// The record id as a string. Numeric ids are rendered as numbers; a missing or otherwise
    /// typed id is empty.
    pub fn id(&self) -> String {
        match self.0.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// The `type` field, if it is a string.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn amount(&self) -> Option<&Value> {
        self.0.get("amount")
    }

    pub fn date(&self) -> Option<&Value> {
        self.0.get("date")
    }

    /// Any other field, e.g. `name` or `category`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Value> for StoredTransaction {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&Transaction> for StoredTransaction {
    fn from(t: &Transaction) -> Self {
        let mut object: Map<String, Value> = t
            .other_fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let _ = object.insert("id".to_string(), Value::from(t.id.clone()));
        let _ = object.insert("type".to_string(), Value::from(t.kind.to_string()));
        let _ = object.insert("amount".to_string(), Value::from(t.amount.to_string()));
        let _ = object.insert(
            "date".to_string(),
            Value::from(t.date.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        Self(Value::Object(object))
    }
}

/// A stored transaction that has passed validation: its type is known, its amount is a
/// non-negative number and its date is an absolute instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: String,
    #[serde(rename = "type")]
    kind: TransactionType,
    amount: Amount,
    date: DateTime<Utc>,
    #[serde(flatten)]
    other_fields: BTreeMap<String, Value>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        kind: TransactionType,
        amount: Amount,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            date,
            other_fields: BTreeMap::new(),
        }
    }

    /// Adds an opaque descriptive field such as `name` or `category`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.other_fields.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn other_fields(&self) -> &BTreeMap<String, Value> {
        &self.other_fields
    }
}

impl TryFrom<&StoredTransaction> for Transaction {
    type Error = SkipReason;

    fn try_from(stored: &StoredTransaction) -> Result<Self, Self::Error> {
        let Value::Object(object) = &stored.0 else {
            return Err(SkipReason::NotAnObject(describe(&stored.0)));
        };
        let raw = |key: &str| describe(object.get(key).unwrap_or(&Value::Null));

        let kind = stored
            .kind()
            .and_then(|k| TransactionType::from_str(k.trim()).ok())
            .ok_or_else(|| SkipReason::InvalidType(raw("type")))?;
        let stored_amount = object.get("amount").unwrap_or(&Value::Null);
        let amount = Amount::from_stored(stored_amount).map_err(|e| match e {
            AmountError::Negative(_) => SkipReason::NegativeAmount(raw("amount")),
            AmountError::NotNumeric(_) => SkipReason::InvalidAmount(raw("amount")),
        })?;
        let date = stored
            .date()
            .and_then(Value::as_str)
            .and_then(parse_date)
            .ok_or_else(|| SkipReason::InvalidDate(raw("date")))?;
        let other_fields = object
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "id" | "type" | "amount" | "date"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            id: stored.id(),
            kind,
            amount,
            date,
            other_fields,
        })
    }
}

/// Strings as they are, anything else as JSON.
fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parses a stored date into an absolute instant.
///
/// Accepts RFC 3339 timestamps with an offset (what the app writes), and falls back to a naive
/// date-time or a plain `YYYY-MM-DD` date, both of which are taken to be UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::from_str(s) {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Why a stored record was left out of the computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "value", rename_all = "snake_case")]
pub enum SkipReason {
    NotAnObject(String),
    InvalidType(String),
    InvalidAmount(String),
    NegativeAmount(String),
    InvalidDate(String),
    AmountOutOfRange(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotAnObject(v) => write!(f, "{v} is not a transaction object"),
            SkipReason::InvalidType(v) => write!(f, "unknown transaction type '{v}'"),
            SkipReason::InvalidAmount(v) => write!(f, "amount {v} is not a number"),
            SkipReason::NegativeAmount(v) => write!(f, "amount {v} is negative"),
            SkipReason::InvalidDate(v) => write!(f, "date '{v}' cannot be parsed"),
            SkipReason::AmountOutOfRange(v) => {
                write!(f, "amount {v} would overflow the running total")
            }
        }
    }
}

/// A record that was excluded from aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub id: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// The outcome of validating a stored collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRecord>,
}

/// Validates every stored record, keeping the good ones in storage order and reporting the rest.
///
/// A record whose amount would push the running sum of its type past what a `Decimal` can hold is
/// reported as `AmountOutOfRange`, so the sums taken over the result never overflow.
pub fn normalize(records: &[StoredTransaction]) -> Normalized {
    let mut normalized = Normalized::default();
    let mut entries = Decimal::ZERO;
    let mut expensives = Decimal::ZERO;
    for record in records {
        let checked = Transaction::try_from(record).and_then(|t| {
            let sum = match t.kind {
                TransactionType::Positive => &mut entries,
                TransactionType::Negative => &mut expensives,
            };
            *sum = sum
                .checked_add(t.amount.value())
                .ok_or_else(|| SkipReason::AmountOutOfRange(t.amount.to_string()))?;
            Ok(t)
        });
        match checked {
            Ok(t) => normalized.transactions.push(t),
            Err(reason) => normalized.skipped.push(SkippedRecord {
                id: record.id(),
                reason,
            }),
        }
    }
    normalized
}
