use super::SQLxRepo;
use crate::installment_plan_repo::InstallmentPlanRepoError::{
    PlanAlreadyExists, PlanInUse, PlanNotFound,
};
use crate::installment_plan_repo::{
    InstallmentPlan, InstallmentPlanRepo, InstallmentPlanRepoError, NewInstallmentPlan,
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::error::ErrorKind;
use tracing::instrument;

const PLAN_COLUMNS: &str = "installment_plan_id, total_amount, number_of_installments, description, start_date, end_date, user_id";

#[derive(sqlx::FromRow)]
struct InstallmentPlanEntry {
    installment_plan_id: String,
    total_amount: i32,
    number_of_installments: i32,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    user_id: String,
}

impl From<InstallmentPlanEntry> for InstallmentPlan {
    fn from(value: InstallmentPlanEntry) -> Self {
        InstallmentPlan {
            installment_plan_id: value.installment_plan_id,
            total_amount: value.total_amount,
            number_of_installments: value.number_of_installments,
            description: value.description,
            start_date: value.start_date,
            end_date: value.end_date,
            user_id: value.user_id,
        }
    }
}

fn map_insert_error(error: sqlx::Error, installment_plan_id: &str) -> InstallmentPlanRepoError {
    if let sqlx::Error::Database(db_error) = &error {
        if matches!(db_error.kind(), ErrorKind::UniqueViolation) {
            return PlanAlreadyExists(installment_plan_id.to_owned());
        }
    }
    anyhow::Error::new(error)
        .context(format!(
            "Unable to insert installment plan {}",
            installment_plan_id
        ))
        .into()
}

fn map_delete_error(error: sqlx::Error, installment_plan_id: &str) -> InstallmentPlanRepoError {
    if let sqlx::Error::Database(db_error) = &error {
        if matches!(db_error.kind(), ErrorKind::ForeignKeyViolation) {
            return PlanInUse(installment_plan_id.to_owned());
        }
    }
    anyhow::Error::new(error)
        .context(format!(
            "Unable to delete installment plan {}",
            installment_plan_id
        ))
        .into()
}

#[async_trait]
impl InstallmentPlanRepo for SQLxRepo {
    #[instrument(skip(self, new_plan))]
    async fn create_plan(
        &self,
        new_plan: NewInstallmentPlan,
    ) -> Result<InstallmentPlan, InstallmentPlanRepoError> {
        sqlx::query(
            "INSERT INTO installment_plans (installment_plan_id, total_amount, number_of_installments, description, start_date, end_date, user_id) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&new_plan.installment_plan_id)
        .bind(new_plan.total_amount)
        .bind(new_plan.number_of_installments)
        .bind(&new_plan.description)
        .bind(new_plan.start_date)
        .bind(new_plan.end_date)
        .bind(&new_plan.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &new_plan.installment_plan_id))?;

        Ok(new_plan.into_plan())
    }

    #[instrument(skip(self))]
    async fn get_plan(
        &self,
        installment_plan_id: &str,
    ) -> Result<InstallmentPlan, InstallmentPlanRepoError> {
        let query = format!(
            "SELECT {} FROM installment_plans WHERE installment_plan_id = $1",
            PLAN_COLUMNS
        );
        let entry: Option<InstallmentPlanEntry> = sqlx::query_as(&query)
            .bind(installment_plan_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to get installment plan {}", installment_plan_id))?;

        entry
            .map(InstallmentPlan::from)
            .ok_or_else(|| PlanNotFound(installment_plan_id.to_owned()))
    }

    #[instrument(skip(self))]
    async fn get_plans(
        &self,
        user_id: &str,
    ) -> Result<Vec<InstallmentPlan>, InstallmentPlanRepoError> {
        let query = format!(
            "SELECT {} FROM installment_plans WHERE user_id = $1 ORDER BY installment_plan_id",
            PLAN_COLUMNS
        );
        let entries: Vec<InstallmentPlanEntry> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get installment plans for user {}", user_id))?;

        Ok(entries.into_iter().map(InstallmentPlan::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_plan(
        &self,
        installment_plan_id: &str,
    ) -> Result<InstallmentPlan, InstallmentPlanRepoError> {
        let query = format!(
            "DELETE FROM installment_plans WHERE installment_plan_id = $1 RETURNING {}",
            PLAN_COLUMNS
        );
        let entry: Option<InstallmentPlanEntry> = sqlx::query_as(&query)
            .bind(installment_plan_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, installment_plan_id))?;

        entry
            .map(InstallmentPlan::from)
            .ok_or_else(|| PlanNotFound(installment_plan_id.to_owned()))
    }
}
