//! Insert command handler.

use crate::args::InsertArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::{parse_date, Transaction};
use crate::reconciler::{append_transaction, NewTransaction};
use crate::store::UserId;
use crate::{Config, Result};
use anyhow::Context;
use serde_json::Value;
use std::collections::BTreeMap;

/// Adds a transaction to the user's collection.
///
/// The id is generated. `date` defaults to the current time when not given.
///
/// # Returns
///
/// On success, returns an `Out` containing the transaction as it was stored.
///
/// # Errors
///
/// - Returns a `Request` error if the amount is negative or the date cannot be parsed.
/// - Returns a `StorageRead` or `StorageWrite` error if the store fails.
pub async fn insert(config: Config, user: UserId, args: InsertArgs) -> Result<Out<Transaction>> {
    let date = match args.date() {
        Some(s) => Some(
            parse_date(s)
                .with_context(|| format!("Unable to parse the date '{s}'"))
                .pub_result(ErrorType::Request)?,
        ),
        None => None,
    };

    let mut fields = BTreeMap::new();
    if let Some(name) = args.name() {
        let _ = fields.insert("name".to_string(), Value::from(name));
    }
    if let Some(category) = args.category() {
        let _ = fields.insert("category".to_string(), Value::from(category));
    }

    let new = NewTransaction {
        kind: args.kind(),
        amount: args.amount(),
        date,
        fields,
    };
    let transaction = append_transaction(&config.store(), &user, new).await?;
    Ok(Out::new(
        format!("Inserted transaction {}", transaction.id()),
        transaction,
    ))
}
