//! Types that represent the data model: persisted transactions, their validated form, and the
//! display-ready records and highlights derived from them.
mod amount;
mod display;
mod highlight;
mod transaction;

pub use amount::{Amount, AmountError};
pub use display::DisplayTransaction;
pub use highlight::{BucketKind, Highlight, HighlightData};
pub use transaction::{
    normalize, parse_date, Normalized, SkipReason, SkippedRecord, StoredTransaction, Transaction,
    TransactionType,
};
