use crate::model::TransactionType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A transaction as handed to presentation: the amount and date are rendered strings, everything
/// else passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: String,
    pub date: String,
    #[serde(flatten)]
    pub other_fields: BTreeMap<String, Value>,
}
