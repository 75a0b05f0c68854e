use super::SQLxRepo;
use crate::account_repo::AccountRepoError::{AccountAlreadyExists, AccountNotFound};
use crate::account_repo::{Account, AccountRepo, AccountRepoError, NewAccount};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::error::ErrorKind;
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct AccountEntry {
    account_id: String,
    name: String,
    user_id: String,
}

impl From<AccountEntry> for Account {
    fn from(value: AccountEntry) -> Self {
        Account {
            account_id: value.account_id,
            name: value.name,
            user_id: value.user_id,
        }
    }
}

fn map_insert_error(error: sqlx::Error, account_id: &str) -> AccountRepoError {
    if let sqlx::Error::Database(db_error) = &error {
        if matches!(db_error.kind(), ErrorKind::UniqueViolation) {
            return AccountAlreadyExists(account_id.to_owned());
        }
    }
    anyhow::Error::new(error)
        .context(format!("Unable to insert account {}", account_id))
        .into()
}

#[async_trait]
impl AccountRepo for SQLxRepo {
    #[instrument(skip(self, new_account))]
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, AccountRepoError> {
        sqlx::query("INSERT INTO accounts (account_id, name, user_id) VALUES ($1, $2, $3)")
            .bind(&new_account.account_id)
            .bind(&new_account.name)
            .bind(&new_account.user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, &new_account.account_id))?;

        Ok(new_account.into_account())
    }

    #[instrument(skip(self))]
    async fn get_account(&self, account_id: &str) -> Result<Account, AccountRepoError> {
        let entry: Option<AccountEntry> =
            sqlx::query_as("SELECT account_id, name, user_id FROM accounts WHERE account_id = $1")
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Unable to get account {}", account_id))?;

        entry
            .map(Account::from)
            .ok_or_else(|| AccountNotFound(account_id.to_owned()))
    }

    #[instrument(skip(self))]
    async fn get_accounts(&self, user_id: &str) -> Result<Vec<Account>, AccountRepoError> {
        let entries: Vec<AccountEntry> = sqlx::query_as(
            "SELECT account_id, name, user_id FROM accounts WHERE user_id = $1 ORDER BY account_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get accounts for user {}", user_id))?;

        Ok(entries.into_iter().map(Account::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, account_id: &str) -> Result<Account, AccountRepoError> {
        let entry: Option<AccountEntry> = sqlx::query_as(
            "DELETE FROM accounts WHERE account_id = $1 RETURNING account_id, name, user_id",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete account {}", account_id))?;

        entry
            .map(Account::from)
            .ok_or_else(|| AccountNotFound(account_id.to_owned()))
    }
}
