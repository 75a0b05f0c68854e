use super::MemRepo;
use crate::account_repo::AccountRepoError::{AccountAlreadyExists, AccountNotFound};
use crate::account_repo::{Account, AccountRepo, AccountRepoError, NewAccount};
use async_trait::async_trait;
use std::collections::hash_map::Entry;

#[async_trait]
impl AccountRepo for MemRepo {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, AccountRepoError> {
        let mut write_guard = self.write_lock()?;

        match write_guard.accounts.entry(new_account.account_id.clone()) {
            Entry::Occupied(e) => Err(AccountAlreadyExists(e.key().clone())),
            Entry::Vacant(e) => {
                let account = new_account.into_account();
                e.insert(account.clone());
                Ok(account)
            }
        }
    }

    async fn get_account(&self, account_id: &str) -> Result<Account, AccountRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| AccountNotFound(account_id.to_owned()))
    }

    async fn get_accounts(&self, user_id: &str) -> Result<Vec<Account>, AccountRepoError> {
        let read_guard = self.read_lock()?;

        let mut accounts: Vec<Account> = read_guard
            .accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.account_id.cmp(&b.account_id));
        Ok(accounts)
    }

    async fn delete_account(&self, account_id: &str) -> Result<Account, AccountRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(account) = write_guard.accounts.remove(account_id) else {
            return Err(AccountNotFound(account_id.to_owned()));
        };

        // cascade to transactions, and through them to splits
        let state = &mut *write_guard;
        state.transactions.retain(|_, t| t.account_id != account_id);
        let transactions = &state.transactions;
        state
            .splits
            .retain(|_, s| transactions.contains_key(&s.transaction_id));

        Ok(account)
    }
}
