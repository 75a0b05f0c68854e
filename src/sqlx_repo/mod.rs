use crate::{HealthCheck, Repos};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

mod account_repo;
mod category_repo;
mod installment_plan_repo;
mod transaction_repo;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Cascade and set-null rules live in the foreign-key clauses of the
/// migrations, the queries here only issue the triggering writes.
pub struct SQLxRepo {
    pool: PgPool,
}

impl SQLxRepo {
    pub fn new(pool: PgPool) -> SQLxRepo {
        SQLxRepo { pool }
    }
}

#[async_trait]
impl HealthCheck for SQLxRepo {
    async fn check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

pub async fn create_repos(database_url: &str, max_pool_size: u32) -> Result<Repos, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_pool_size)
        .connect(database_url)
        .await
        .context("Unable to connect to database")?;
    MIGRATOR
        .run(&pool)
        .await
        .context("Unable to run migrations")?;

    let repo = Arc::new(SQLxRepo::new(pool));
    Ok(Repos {
        category_repo: repo.clone(),
        account_repo: repo.clone(),
        installment_plan_repo: repo.clone(),
        transaction_repo: repo.clone(),
        health_check: repo,
    })
}
