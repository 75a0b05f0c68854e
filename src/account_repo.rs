use crate::validation::{self, ValidationError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[async_trait]
pub trait AccountRepo: Sync + Send {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, AccountRepoError>;

    async fn get_account(&self, account_id: &str) -> Result<Account, AccountRepoError>;

    async fn get_accounts(&self, user_id: &str) -> Result<Vec<Account>, AccountRepoError>;

    /// Deletes the account along with its transactions and their splits.
    async fn delete_account(&self, account_id: &str) -> Result<Account, AccountRepoError>;
}

#[derive(Error, Debug)]
pub enum AccountRepoError {
    #[error("Account with id {0} not found")]
    AccountNotFound(String),
    #[error("Account with id {0} already exists")]
    AccountAlreadyExists(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Account {
    pub account_id: String,
    pub name: String,
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewAccount {
    pub account_id: String,
    pub name: String,
    pub user_id: String,
}

impl NewAccount {
    pub fn validate(fields: &Map<String, Value>) -> Result<NewAccount, ValidationError> {
        Ok(NewAccount {
            account_id: validation::require_text(fields, "account_id")?,
            name: validation::require_text(fields, "name")?,
            user_id: validation::require_text(fields, "user_id")?,
        })
    }

    pub fn into_account(self) -> Account {
        Account {
            account_id: self.account_id,
            name: self.name,
            user_id: self.user_id,
        }
    }
}
