use crate::validation::{self, ValidationError};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[async_trait]
pub trait InstallmentPlanRepo: Sync + Send {
    async fn create_plan(
        &self,
        new_plan: NewInstallmentPlan,
    ) -> Result<InstallmentPlan, InstallmentPlanRepoError>;

    async fn get_plan(
        &self,
        installment_plan_id: &str,
    ) -> Result<InstallmentPlan, InstallmentPlanRepoError>;

    async fn get_plans(
        &self,
        user_id: &str,
    ) -> Result<Vec<InstallmentPlan>, InstallmentPlanRepoError>;

    /// Refused while any transaction still references the plan.
    async fn delete_plan(
        &self,
        installment_plan_id: &str,
    ) -> Result<InstallmentPlan, InstallmentPlanRepoError>;
}

#[derive(Error, Debug)]
pub enum InstallmentPlanRepoError {
    #[error("Installment plan with id {0} not found")]
    PlanNotFound(String),
    #[error("Installment plan with id {0} already exists")]
    PlanAlreadyExists(String),
    #[error("Installment plan with id {0} is referenced by transactions")]
    PlanInUse(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct InstallmentPlan {
    pub installment_plan_id: String,
    pub total_amount: i32,
    pub number_of_installments: i32,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewInstallmentPlan {
    pub installment_plan_id: String,
    pub total_amount: i32,
    pub number_of_installments: i32,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub user_id: String,
}

impl NewInstallmentPlan {
    pub fn validate(fields: &Map<String, Value>) -> Result<NewInstallmentPlan, ValidationError> {
        Ok(NewInstallmentPlan {
            installment_plan_id: validation::require_text(fields, "installment_plan_id")?,
            total_amount: validation::require_integer(fields, "total_amount")?,
            number_of_installments: validation::require_integer(fields, "number_of_installments")?,
            description: validation::optional_text(fields, "description")?,
            start_date: validation::require_date(fields, "start_date")?,
            end_date: validation::optional_date(fields, "end_date")?,
            user_id: validation::require_text(fields, "user_id")?,
        })
    }

    pub fn into_plan(self) -> InstallmentPlan {
        InstallmentPlan {
            installment_plan_id: self.installment_plan_id,
            total_amount: self.total_amount,
            number_of_installments: self.number_of_installments,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            user_id: self.user_id,
        }
    }
}
