use super::SQLxRepo;
use crate::transaction_repo::TransactionRepoError::{
    AccountNotFound, CategoryNotFound, InstallmentPlanNotFound, SplitNotFound,
    TransactionAlreadyExists, TransactionNotFound,
};
use crate::transaction_repo::{
    Filter, NewTransaction, NewTransactionUser, Transaction, TransactionRepo,
    TransactionRepoError, TransactionUser,
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::error::ErrorKind;
use sqlx::QueryBuilder;
use tracing::instrument;

const TRANSACTION_COLUMNS: &str = "transaction_id, amount, payee, notes, date, account_id, category_id, installment_plan_id, installment_number";

#[derive(sqlx::FromRow)]
struct TransactionEntry {
    transaction_id: String,
    amount: i32,
    payee: String,
    notes: Option<String>,
    date: NaiveDate,
    account_id: String,
    category_id: Option<String>,
    installment_plan_id: Option<String>,
    installment_number: Option<i32>,
}

impl From<TransactionEntry> for Transaction {
    fn from(value: TransactionEntry) -> Self {
        Transaction {
            transaction_id: value.transaction_id,
            amount: value.amount,
            payee: value.payee,
            notes: value.notes,
            date: value.date,
            account_id: value.account_id,
            category_id: value.category_id,
            installment_plan_id: value.installment_plan_id,
            installment_number: value.installment_number,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SplitEntry {
    transaction_user_id: i32,
    transaction_id: String,
    user_id: String,
    amount: i32,
}

impl From<SplitEntry> for TransactionUser {
    fn from(value: SplitEntry) -> Self {
        TransactionUser {
            transaction_user_id: value.transaction_user_id,
            transaction_id: value.transaction_id,
            user_id: value.user_id,
            amount: value.amount,
        }
    }
}

fn map_write_error(error: sqlx::Error, new_transaction: &NewTransaction) -> TransactionRepoError {
    if let sqlx::Error::Database(db_error) = &error {
        match db_error.kind() {
            ErrorKind::UniqueViolation => {
                return TransactionAlreadyExists(new_transaction.transaction_id.clone());
            }
            ErrorKind::ForeignKeyViolation => match db_error.constraint() {
                Some("transactions_account_id_fkey") => {
                    return AccountNotFound(new_transaction.account_id.clone());
                }
                Some("transactions_category_id_fkey") => {
                    if let Some(category_id) = &new_transaction.category_id {
                        return CategoryNotFound(category_id.clone());
                    }
                }
                Some("transactions_installment_plan_id_fkey") => {
                    if let Some(installment_plan_id) = &new_transaction.installment_plan_id {
                        return InstallmentPlanNotFound(installment_plan_id.clone());
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }
    anyhow::Error::new(error)
        .context(format!(
            "Unable to write transaction {}",
            new_transaction.transaction_id
        ))
        .into()
}

fn map_split_insert_error(
    error: sqlx::Error,
    new_split: &NewTransactionUser,
) -> TransactionRepoError {
    if let sqlx::Error::Database(db_error) = &error {
        if matches!(db_error.kind(), ErrorKind::ForeignKeyViolation) {
            return TransactionNotFound(new_split.transaction_id.clone());
        }
    }
    anyhow::Error::new(error)
        .context(format!(
            "Unable to insert split for transaction {}",
            new_split.transaction_id
        ))
        .into()
}

#[async_trait]
impl TransactionRepo for SQLxRepo {
    #[instrument(skip(self, new_transaction))]
    async fn create_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        sqlx::query(
            "INSERT INTO transactions (transaction_id, amount, payee, notes, date, account_id, category_id, installment_plan_id, installment_number) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&new_transaction.transaction_id)
        .bind(new_transaction.amount)
        .bind(&new_transaction.payee)
        .bind(&new_transaction.notes)
        .bind(new_transaction.date)
        .bind(&new_transaction.account_id)
        .bind(&new_transaction.category_id)
        .bind(&new_transaction.installment_plan_id)
        .bind(new_transaction.installment_number)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &new_transaction))?;

        Ok(new_transaction.into_transaction())
    }

    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Transaction, TransactionRepoError> {
        let query = format!(
            "SELECT {} FROM transactions WHERE transaction_id = $1",
            TRANSACTION_COLUMNS
        );
        let entry: Option<TransactionEntry> = sqlx::query_as(&query)
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to get transaction {}", transaction_id))?;

        entry
            .map(Transaction::from)
            .ok_or_else(|| TransactionNotFound(transaction_id.to_owned()))
    }

    #[instrument(skip(self))]
    async fn get_transactions(
        &self,
        filter: Filter,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let mut query_builder = QueryBuilder::new(format!(
            "SELECT {} FROM transactions WHERE TRUE",
            TRANSACTION_COLUMNS
        ));
        if let Some(account_id) = filter.account_id {
            query_builder
                .push(" AND account_id = ")
                .push_bind(account_id);
        }
        if let Some(category_id) = filter.category_id {
            query_builder
                .push(" AND category_id = ")
                .push_bind(category_id);
        }
        if let Some(from) = filter.from {
            query_builder.push(" AND date >= ").push_bind(from);
        }
        if let Some(until) = filter.until {
            query_builder.push(" AND date <= ").push_bind(until);
        }
        query_builder.push(" ORDER BY date DESC, transaction_id DESC");

        let query = query_builder.build_query_as();
        let entries: Vec<TransactionEntry> = query
            .fetch_all(&self.pool)
            .await
            .context("Unable to get transactions")?;

        Ok(entries.into_iter().map(Transaction::from).collect())
    }

    #[instrument(skip(self, updated_transaction))]
    async fn update_transaction(
        &self,
        transaction_id: &str,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let result = sqlx::query(
            "UPDATE transactions SET amount = $1, payee = $2, notes = $3, date = $4, account_id = $5, category_id = $6, installment_plan_id = $7, installment_number = $8 WHERE transaction_id = $9",
        )
        .bind(updated_transaction.amount)
        .bind(&updated_transaction.payee)
        .bind(&updated_transaction.notes)
        .bind(updated_transaction.date)
        .bind(&updated_transaction.account_id)
        .bind(&updated_transaction.category_id)
        .bind(&updated_transaction.installment_plan_id)
        .bind(updated_transaction.installment_number)
        .bind(transaction_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &updated_transaction))?;

        if result.rows_affected() == 0 {
            return Err(TransactionNotFound(transaction_id.to_owned()));
        }

        let mut transaction = updated_transaction.into_transaction();
        transaction.transaction_id = transaction_id.to_owned();
        Ok(transaction)
    }

    #[instrument(skip(self))]
    async fn delete_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Transaction, TransactionRepoError> {
        let query = format!(
            "DELETE FROM transactions WHERE transaction_id = $1 RETURNING {}",
            TRANSACTION_COLUMNS
        );
        let entry: Option<TransactionEntry> = sqlx::query_as(&query)
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to delete transaction {}", transaction_id))?;

        entry
            .map(Transaction::from)
            .ok_or_else(|| TransactionNotFound(transaction_id.to_owned()))
    }

    #[instrument(skip(self, new_split))]
    async fn add_split(
        &self,
        new_split: NewTransactionUser,
    ) -> Result<TransactionUser, TransactionRepoError> {
        let transaction_user_id: i32 = sqlx::query_scalar(
            "INSERT INTO transaction_users (transaction_id, user_id, amount) VALUES ($1, $2, $3) RETURNING transaction_user_id",
        )
        .bind(&new_split.transaction_id)
        .bind(&new_split.user_id)
        .bind(new_split.amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_split_insert_error(e, &new_split))?;

        Ok(new_split.into_split(transaction_user_id))
    }

    #[instrument(skip(self))]
    async fn get_splits(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<TransactionUser>, TransactionRepoError> {
        let entries: Vec<SplitEntry> = sqlx::query_as(
            "SELECT transaction_user_id, transaction_id, user_id, amount FROM transaction_users WHERE transaction_id = $1 ORDER BY transaction_user_id",
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get splits of transaction {}", transaction_id))?;

        Ok(entries.into_iter().map(TransactionUser::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_split(
        &self,
        transaction_user_id: i32,
    ) -> Result<TransactionUser, TransactionRepoError> {
        let entry: Option<SplitEntry> = sqlx::query_as(
            "DELETE FROM transaction_users WHERE transaction_user_id = $1 RETURNING transaction_user_id, transaction_id, user_id, amount",
        )
        .bind(transaction_user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete split {}", transaction_user_id))?;

        entry
            .map(TransactionUser::from)
            .ok_or(SplitNotFound(transaction_user_id))
    }
}
