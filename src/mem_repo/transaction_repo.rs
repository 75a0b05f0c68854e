use super::{MemRepo, State};
use crate::transaction_repo::TransactionRepoError::{
    AccountNotFound, CategoryNotFound, InstallmentPlanNotFound, SplitNotFound,
    TransactionAlreadyExists, TransactionNotFound,
};
use crate::transaction_repo::{
    Filter, NewTransaction, NewTransactionUser, Transaction, TransactionRepo,
    TransactionRepoError, TransactionUser,
};
use async_trait::async_trait;

/// Insert-time referential checks. The SQL backend gets these from the
/// foreign-key clauses in the table layout.
fn check_references(
    state: &State,
    new_transaction: &NewTransaction,
) -> Result<(), TransactionRepoError> {
    if !state.accounts.contains_key(&new_transaction.account_id) {
        return Err(AccountNotFound(new_transaction.account_id.clone()));
    }
    if let Some(category_id) = &new_transaction.category_id {
        if !state.categories.contains_key(category_id) {
            return Err(CategoryNotFound(category_id.clone()));
        }
    }
    if let Some(installment_plan_id) = &new_transaction.installment_plan_id {
        if !state.installment_plans.contains_key(installment_plan_id) {
            return Err(InstallmentPlanNotFound(installment_plan_id.clone()));
        }
    }
    Ok(())
}

#[async_trait]
impl TransactionRepo for MemRepo {
    async fn create_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        check_references(&write_guard, &new_transaction)?;
        if write_guard
            .transactions
            .contains_key(&new_transaction.transaction_id)
        {
            return Err(TransactionAlreadyExists(new_transaction.transaction_id));
        }

        let transaction = new_transaction.into_transaction();
        write_guard
            .transactions
            .insert(transaction.transaction_id.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Transaction, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .transactions
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| TransactionNotFound(transaction_id.to_owned()))
    }

    async fn get_transactions(
        &self,
        filter: Filter,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let mut transactions: Vec<Transaction> =
            read_guard.transactions.values().cloned().collect();
        transactions.sort_by(|a, b| b.cmp(a));

        let mut transactions: Box<dyn Iterator<Item = Transaction>> =
            Box::new(transactions.into_iter());
        if let Some(account_id) = filter.account_id {
            transactions = Box::new(transactions.filter(move |t| t.account_id == account_id));
        }
        if let Some(category_id) = filter.category_id {
            transactions =
                Box::new(transactions.filter(move |t| t.category_id.as_deref() == Some(category_id.as_str())));
        }
        if let Some(from) = filter.from {
            transactions = Box::new(transactions.filter(move |t| t.date >= from));
        }
        if let Some(until) = filter.until {
            transactions = Box::new(transactions.filter(move |t| t.date <= until));
        }

        Ok(transactions.collect())
    }

    async fn update_transaction(
        &self,
        transaction_id: &str,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard.transactions.contains_key(transaction_id) {
            return Err(TransactionNotFound(transaction_id.to_owned()));
        }
        check_references(&write_guard, &updated_transaction)?;

        let mut transaction = updated_transaction.into_transaction();
        transaction.transaction_id = transaction_id.to_owned();
        write_guard
            .transactions
            .insert(transaction_id.to_owned(), transaction.clone());
        Ok(transaction)
    }

    async fn delete_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(transaction) = write_guard.transactions.remove(transaction_id) else {
            return Err(TransactionNotFound(transaction_id.to_owned()));
        };

        // cascade to splits
        write_guard
            .splits
            .retain(|_, s| s.transaction_id != transaction_id);

        Ok(transaction)
    }

    async fn add_split(
        &self,
        new_split: NewTransactionUser,
    ) -> Result<TransactionUser, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard
            .transactions
            .contains_key(&new_split.transaction_id)
        {
            return Err(TransactionNotFound(new_split.transaction_id));
        }

        let transaction_user_id = write_guard.next_split_id;
        write_guard.next_split_id += 1;

        let split = new_split.into_split(transaction_user_id);
        write_guard.splits.insert(transaction_user_id, split.clone());
        Ok(split)
    }

    async fn get_splits(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<TransactionUser>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let mut splits: Vec<TransactionUser> = read_guard
            .splits
            .values()
            .filter(|s| s.transaction_id == transaction_id)
            .cloned()
            .collect();
        splits.sort_by_key(|s| s.transaction_user_id);
        Ok(splits)
    }

    async fn delete_split(
        &self,
        transaction_user_id: i32,
    ) -> Result<TransactionUser, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard
            .splits
            .remove(&transaction_user_id)
            .ok_or(SplitNotFound(transaction_user_id))
    }
}
