use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One of the three aggregation buckets shown on the dashboard.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketKind {
    /// All `positive` transactions.
    Entries,
    /// All `negative` transactions.
    Expensives,
    /// Entries minus expensives.
    Total,
}

serde_plain::derive_display_from_serialize!(BucketKind);

/// The summary shown for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// The bucket sum rendered as a currency string.
    pub amount: String,
    /// A sentence describing the most recent activity in the bucket.
    pub last_transaction: String,
    /// The bucket sum itself. Arithmetic is always done on this, never on `amount`.
    pub value: Decimal,
}

/// Display-ready summary data. Derived from the current transactions each time it is needed and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightData {
    pub entries: Highlight,
    pub expensives: Highlight,
    pub total: Highlight,
}

impl HighlightData {
    pub fn get(&self, kind: BucketKind) -> &Highlight {
        match kind {
            BucketKind::Entries => &self.entries,
            BucketKind::Expensives => &self.expensives,
            BucketKind::Total => &self.total,
        }
    }
}
