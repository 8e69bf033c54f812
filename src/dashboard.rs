//! The dashboard state: everything the summary screen shows, derived from a user's stored
//! collection.
//!
//! A `Dashboard` is never edited in place. Each step of the pipeline (load, delete) produces a
//! new one from what is in storage, so a failed step leaves the caller's previous value as it was.

use crate::engine::{compute_highlights, normalize_for_display};
use crate::format::{ActivityFormatter, CurrencyFormatter};
use crate::model::{
    normalize, DisplayTransaction, HighlightData, SkippedRecord, StoredTransaction,
};
use crate::reconciler::delete_transaction;
use crate::store::{TransactionStore, UserId};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Heading of the transaction list, which depends on whether there are any transactions.
    pub title: String,
    pub transactions: Vec<DisplayTransaction>,
    pub highlights: HighlightData,
    /// Stored records that could not be used. They remain in storage untouched.
    pub skipped: Vec<SkippedRecord>,
}

impl Dashboard {
    /// Builds a dashboard from stored records. Records that fail validation are left out and
    /// listed in `skipped`.
    pub fn compute<F>(records: &[StoredTransaction], formatter: &F) -> Self
    where
        F: CurrencyFormatter + ActivityFormatter + ?Sized,
    {
        let normalized = normalize(records);
        for skipped in &normalized.skipped {
            warn!("Skipping stored transaction '{}': {}", skipped.id, skipped.reason);
        }
        Self {
            title: formatter.transactions_title(!normalized.transactions.is_empty()),
            transactions: normalize_for_display(&normalized.transactions, formatter),
            highlights: compute_highlights(&normalized.transactions, formatter),
            skipped: normalized.skipped,
        }
    }

    /// Reads the user's collection and builds a dashboard from it.
    pub async fn load<F>(store: &TransactionStore, user: &UserId, formatter: &F) -> Result<Self>
    where
        F: CurrencyFormatter + ActivityFormatter + ?Sized,
    {
        let records = store.read(user).await?;
        Ok(Self::compute(&records, formatter))
    }

    /// Deletes a transaction and returns the dashboard of the collection that was persisted,
    /// along with whether anything was removed.
    ///
    /// The new dashboard only exists once the write has succeeded. On error the caller still holds
    /// its previous dashboard, which matches what is in storage.
    pub async fn delete<F>(
        store: &TransactionStore,
        user: &UserId,
        transaction_id: &str,
        formatter: &F,
    ) -> Result<(Self, bool)>
    where
        F: CurrencyFormatter + ActivityFormatter + ?Sized,
    {
        let deletion = delete_transaction(store, user, transaction_id).await?;
        Ok((
            Self::compute(&deletion.remaining, formatter),
            deletion.removed.is_some(),
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
