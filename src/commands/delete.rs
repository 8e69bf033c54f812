//! Delete command handler.

use crate::commands::Out;
use crate::dashboard::Dashboard;
use crate::store::UserId;
use crate::{Config, Result};
use anyhow::Context;

/// Removes the transaction with `id` and returns the recomputed dashboard.
///
/// Removing an id that does not exist succeeds and says so in the message. If the store fails
/// the error keeps its `StorageRead` or `StorageWrite` type and nothing in storage has changed,
/// so the command can simply be retried.
pub async fn delete(config: Config, user: UserId, id: &str) -> Result<Out<Dashboard>> {
    let locale = config.locale()?;
    let (dashboard, removed) = Dashboard::delete(&config.store(), &user, id, &locale)
        .await
        .with_context(|| format!("Unable to remove the transaction {id}"))?;
    let message = if removed {
        "Transaction removed successfully".to_string()
    } else {
        format!("No transaction with id '{id}' was found, nothing was removed")
    };
    Ok(Out::new(message, dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{error_type, ErrorType};
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete() {
        let env = TestEnv::new().await;
        let user = UserId::new("42").unwrap();
        env.seed(&user).await;

        let out = delete(env.config(), user.clone(), "t2").await.unwrap();
        assert_eq!(out.message(), "Transaction removed successfully");
        let dashboard = out.structure().unwrap();
        assert_eq!(dashboard.transactions.len(), 2);
        assert_eq!(dashboard.highlights.expensives.amount, "R$0.00");

        let out = delete(env.config(), user.clone(), "t2").await.unwrap();
        assert!(out.message().starts_with("No transaction with id 't2'"));
        assert_eq!(out.structure().unwrap().transactions.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_other_user_untouched() {
        let env = TestEnv::new().await;
        let alice = UserId::new("alice").unwrap();
        let bob = UserId::new("bob").unwrap();
        env.seed(&alice).await;
        env.seed(&bob).await;

        let _ = delete(env.config(), alice, "t1").await.unwrap();
        assert_eq!(env.config().store().read(&bob).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_corrupt_storage() {
        let env = TestEnv::new().await;
        let user = UserId::new("42").unwrap();
        let path = env.config().storage_path();
        let contents = serde_json::json!({
            "@gofinances:transactions_user:42": "not an array"
        });
        tokio::fs::write(&path, contents.to_string()).await.unwrap();

        let e = delete(env.config(), user, "t1").await.unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::StorageRead));
    }
}
