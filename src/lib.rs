//! Data model and storage repositories for a personal finance tracker:
//! categories, subcategories, accounts, installment plans, transactions and
//! per-user transaction splits.

use async_trait::async_trait;
use std::sync::Arc;

pub mod account_repo;
pub mod category_repo;
pub mod installment_plan_repo;
pub mod schema;
pub mod transaction_repo;
pub mod validation;

// implementation modules
pub mod mem_repo;
pub mod sqlx_repo;

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> bool;
}

/// Handles to one storage backend. All repos returned by a `create_repos`
/// share the same underlying store, so cross-entity delete rules hold.
pub struct Repos {
    pub category_repo: Arc<dyn category_repo::CategoryRepo>,
    pub account_repo: Arc<dyn account_repo::AccountRepo>,
    pub installment_plan_repo: Arc<dyn installment_plan_repo::InstallmentPlanRepo>,
    pub transaction_repo: Arc<dyn transaction_repo::TransactionRepo>,
    pub health_check: Arc<dyn HealthCheck>,
}
