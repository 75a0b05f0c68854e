use crate::validation::{self, ValidationError};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Clone, Debug, Default)]
pub struct Filter {
    pub account_id: Option<String>,
    pub category_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl Filter {
    pub const NONE: Filter = Filter {
        account_id: None,
        category_id: None,
        from: None,
        until: None,
    };
}

#[async_trait]
pub trait TransactionRepo: Sync + Send {
    async fn create_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn get_transactions(
        &self,
        filter: Filter,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    async fn update_transaction(
        &self,
        transaction_id: &str,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    /// Deletes the transaction and its splits.
    async fn delete_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn add_split(
        &self,
        new_split: NewTransactionUser,
    ) -> Result<TransactionUser, TransactionRepoError>;

    async fn get_splits(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<TransactionUser>, TransactionRepoError>;

    async fn delete_split(
        &self,
        transaction_user_id: i32,
    ) -> Result<TransactionUser, TransactionRepoError>;
}

#[derive(Error, Debug)]
pub enum TransactionRepoError {
    #[error("Transaction with id {0} not found")]
    TransactionNotFound(String),
    #[error("Transaction with id {0} already exists")]
    TransactionAlreadyExists(String),
    #[error("Split with id {0} not found")]
    SplitNotFound(i32),
    #[error("Account with id {0} not found")]
    AccountNotFound(String),
    #[error("Category with id {0} not found")]
    CategoryNotFound(String),
    #[error("Installment plan with id {0} not found")]
    InstallmentPlanNotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Transaction {
    pub transaction_id: String,
    pub amount: i32,
    pub payee: String,
    pub notes: Option<String>,
    pub date: NaiveDate,
    pub account_id: String,
    pub category_id: Option<String>,
    pub installment_plan_id: Option<String>,
    pub installment_number: Option<i32>,
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Transaction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.transaction_id.cmp(&other.transaction_id))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewTransaction {
    pub transaction_id: String,
    pub amount: i32,
    pub payee: String,
    pub notes: Option<String>,
    pub date: NaiveDate,
    pub account_id: String,
    pub category_id: Option<String>,
    pub installment_plan_id: Option<String>,
    pub installment_number: Option<i32>,
}

impl NewTransaction {
    pub fn validate(fields: &Map<String, Value>) -> Result<NewTransaction, ValidationError> {
        Ok(NewTransaction {
            transaction_id: validation::require_text(fields, "transaction_id")?,
            amount: validation::require_integer(fields, "amount")?,
            payee: validation::require_text(fields, "payee")?,
            notes: validation::optional_text(fields, "notes")?,
            date: validation::require_date(fields, "date")?,
            account_id: validation::require_text(fields, "account_id")?,
            category_id: validation::optional_text(fields, "category_id")?,
            installment_plan_id: validation::optional_text(fields, "installment_plan_id")?,
            installment_number: validation::optional_positive(fields, "installment_number")?,
        })
    }

    pub fn into_transaction(self) -> Transaction {
        Transaction {
            transaction_id: self.transaction_id,
            amount: self.amount,
            payee: self.payee,
            notes: self.notes,
            date: self.date,
            account_id: self.account_id,
            category_id: self.category_id,
            installment_plan_id: self.installment_plan_id,
            installment_number: self.installment_number,
        }
    }
}

/// One user's share of a transaction's amount.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct TransactionUser {
    pub transaction_user_id: i32,
    pub transaction_id: String,
    pub user_id: String,
    pub amount: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewTransactionUser {
    pub transaction_id: String,
    pub user_id: String,
    pub amount: i32,
}

impl NewTransactionUser {
    /// The surrogate key is assigned by the store and is not accepted as
    /// insert input.
    pub fn validate(fields: &Map<String, Value>) -> Result<NewTransactionUser, ValidationError> {
        Ok(NewTransactionUser {
            transaction_id: validation::require_text(fields, "transaction_id")?,
            user_id: validation::require_text(fields, "user_id")?,
            amount: validation::require_integer(fields, "amount")?,
        })
    }

    pub fn into_split(self, transaction_user_id: i32) -> TransactionUser {
        TransactionUser {
            transaction_user_id,
            transaction_id: self.transaction_id,
            user_id: self.user_id,
            amount: self.amount,
        }
    }
}
