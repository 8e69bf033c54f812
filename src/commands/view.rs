//! Read-only command handlers.

use crate::commands::Out;
use crate::dashboard::Dashboard;
use crate::model::{DisplayTransaction, HighlightData};
use crate::store::UserId;
use crate::{Config, Result};
use std::fmt::Write;

/// Loads the user's transactions and summarizes them into the three highlights.
pub async fn highlights(config: Config, user: UserId) -> Result<Out<HighlightData>> {
    let dashboard = load(&config, &user).await?;
    let h = &dashboard.highlights;
    let mut message = String::new();
    let _ = writeln!(message, "Entries: {} ({})", h.entries.amount, h.entries.last_transaction);
    let _ = writeln!(
        message,
        "Exits: {} ({})",
        h.expensives.amount, h.expensives.last_transaction
    );
    let _ = write!(message, "Total: {} ({})", h.total.amount, h.total.last_transaction);
    if !dashboard.skipped.is_empty() {
        let _ = write!(
            message,
            "\n{} stored transaction(s) could not be read and were left out",
            dashboard.skipped.len()
        );
    }
    Ok(Out::new(message, dashboard.highlights))
}

/// Loads the user's transactions and renders each one for display, in storage order.
pub async fn list(config: Config, user: UserId) -> Result<Out<Vec<DisplayTransaction>>> {
    let dashboard = load(&config, &user).await?;
    let mut message = dashboard.title.clone();
    for t in &dashboard.transactions {
        let name = t
            .other_fields
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let _ = write!(
            message,
            "\n{}  {}  {:>8}  {:>14}  {}",
            t.id, t.date, t.kind, t.amount, name
        );
    }
    Ok(Out::new(message, dashboard.transactions))
}

async fn load(config: &Config, user: &UserId) -> Result<Dashboard> {
    let locale = config.locale()?;
    Dashboard::load(&config.store(), user, &locale).await
}
