use crate::account_repo::Account;
use crate::category_repo::{Category, Subcategory};
use crate::installment_plan_repo::InstallmentPlan;
use crate::transaction_repo::{Transaction, TransactionUser};
use crate::{HealthCheck, Repos};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod account_repo;
mod category_repo;
mod installment_plan_repo;
mod transaction_repo;

pub(crate) struct State {
    pub(crate) categories: HashMap<String, Category>,
    pub(crate) subcategories: HashMap<String, Subcategory>,
    pub(crate) accounts: HashMap<String, Account>,
    pub(crate) installment_plans: HashMap<String, InstallmentPlan>,
    pub(crate) transactions: HashMap<String, Transaction>,
    pub(crate) splits: HashMap<i32, TransactionUser>,
    pub(crate) next_split_id: i32,
}

/// All entity maps live behind one lock so that delete rules spanning
/// entities (cascade, set-null) are applied atomically.
pub struct MemRepo {
    state: RwLock<State>,
}

impl MemRepo {
    pub fn new() -> MemRepo {
        let state = State {
            categories: HashMap::new(),
            subcategories: HashMap::new(),
            accounts: HashMap::new(),
            installment_plans: HashMap::new(),
            transactions: HashMap::new(),
            splits: HashMap::new(),
            next_split_id: 1,
        };
        MemRepo {
            state: RwLock::new(state),
        }
    }

    pub(crate) fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    pub(crate) fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemRepo {
    fn default() -> Self {
        MemRepo::new()
    }
}

#[async_trait]
impl HealthCheck for MemRepo {
    async fn check(&self) -> bool {
        true
    }
}

pub fn create_repos() -> Repos {
    let repo = Arc::new(MemRepo::new());
    Repos {
        category_repo: repo.clone(),
        account_repo: repo.clone(),
        installment_plan_repo: repo.clone(),
        transaction_repo: repo.clone(),
        health_check: repo,
    }
}
