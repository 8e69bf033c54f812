//! Mutations of a user's persisted collection.
//!
//! The store can only replace a whole collection, so every mutation is a read-modify-write. Each
//! one holds the user's write lock from the read until the write has completed, so overlapping
//! mutations for the same user are applied one after the other instead of overwriting each other.

use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, StoredTransaction, Transaction, TransactionType};
use crate::store::{TransactionStore, UserId};
use crate::Result;
use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

/// The outcome of a deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct Deletion {
    /// The record that was removed, or `None` if no record had the requested id.
    pub removed: Option<StoredTransaction>,
    /// The collection as it is now persisted.
    pub remaining: Vec<StoredTransaction>,
}

/// Removes the transaction with `transaction_id` from the user's persisted collection.
///
/// Deleting an id that is not present is not an error: nothing is written and the collection is
/// returned unchanged. A failed write is returned tagged `StorageWrite`, in which case nothing has
/// changed in storage.
pub async fn delete_transaction(
    store: &TransactionStore,
    user: &UserId,
    transaction_id: &str,
) -> Result<Deletion> {
    let _guard = store.lock(user).await;
    let mut records = store.read(user).await?;

    let Some(position) = records.iter().position(|r| r.id() == transaction_id) else {
        debug!("No transaction with id {transaction_id} for user {user}, nothing to delete");
        return Ok(Deletion {
            removed: None,
            remaining: records,
        });
    };

    let removed = records.remove(position);
    store.write(user, &records).await?;
    info!("Removed transaction {transaction_id} for user {user}");
    Ok(Deletion {
        removed: Some(removed),
        remaining: records,
    })
}

/// A transaction to be created. The id is assigned when it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionType,
    /// Must be a non-negative magnitude; the type decides the direction.
    pub amount: Decimal,
    /// Defaults to the current time.
    pub date: Option<DateTime<Utc>>,
    /// Descriptive fields such as `name` and `category`.
    pub fields: BTreeMap<String, Value>,
}

/// Validates `new` and appends it to the user's persisted collection.
///
/// A negative amount is rejected with a `Request` error before anything is read or written, so
/// storage only ever holds non-negative magnitudes.
pub async fn append_transaction(
    store: &TransactionStore,
    user: &UserId,
    new: NewTransaction,
) -> Result<Transaction> {
    let amount = Amount::new(new.amount).pub_result(ErrorType::Request)?;
    // Stored dates carry milliseconds
    let date = new.date.unwrap_or_else(Utc::now).trunc_subsecs(3);
    let mut transaction = Transaction::new(Uuid::new_v4().to_string(), new.kind, amount, date);
    for (key, value) in new.fields {
        transaction = transaction.with_field(key, value);
    }

    let _guard = store.lock(user).await;
    let mut records = store.read(user).await?;
    records.push(StoredTransaction::from(&transaction));
    store.write(user, &records).await?;
    info!(
        "Added {} transaction {} for user {user}",
        transaction.kind(),
        transaction.id()
    );
    Ok(transaction)
}
