use super::MemRepo;
use crate::installment_plan_repo::InstallmentPlanRepoError::{
    PlanAlreadyExists, PlanInUse, PlanNotFound,
};
use crate::installment_plan_repo::{
    InstallmentPlan, InstallmentPlanRepo, InstallmentPlanRepoError, NewInstallmentPlan,
};
use async_trait::async_trait;
use std::collections::hash_map::Entry;

#[async_trait]
impl InstallmentPlanRepo for MemRepo {
    async fn create_plan(
        &self,
        new_plan: NewInstallmentPlan,
    ) -> Result<InstallmentPlan, InstallmentPlanRepoError> {
        let mut write_guard = self.write_lock()?;

        match write_guard
            .installment_plans
            .entry(new_plan.installment_plan_id.clone())
        {
            Entry::Occupied(e) => Err(PlanAlreadyExists(e.key().clone())),
            Entry::Vacant(e) => {
                let plan = new_plan.into_plan();
                e.insert(plan.clone());
                Ok(plan)
            }
        }
    }

    async fn get_plan(
        &self,
        installment_plan_id: &str,
    ) -> Result<InstallmentPlan, InstallmentPlanRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .installment_plans
            .get(installment_plan_id)
            .cloned()
            .ok_or_else(|| PlanNotFound(installment_plan_id.to_owned()))
    }

    async fn get_plans(
        &self,
        user_id: &str,
    ) -> Result<Vec<InstallmentPlan>, InstallmentPlanRepoError> {
        let read_guard = self.read_lock()?;

        let mut plans: Vec<InstallmentPlan> = read_guard
            .installment_plans
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        plans.sort_by(|a, b| a.installment_plan_id.cmp(&b.installment_plan_id));
        Ok(plans)
    }

    async fn delete_plan(
        &self,
        installment_plan_id: &str,
    ) -> Result<InstallmentPlan, InstallmentPlanRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard
            .installment_plans
            .contains_key(installment_plan_id)
        {
            return Err(PlanNotFound(installment_plan_id.to_owned()));
        }

        // no delete action on the transaction reference: refuse while in use
        let referenced = write_guard
            .transactions
            .values()
            .any(|t| t.installment_plan_id.as_deref() == Some(installment_plan_id));
        if referenced {
            return Err(PlanInUse(installment_plan_id.to_owned()));
        }

        let plan = write_guard
            .installment_plans
            .remove(installment_plan_id)
            .expect("plan existence checked above");
        Ok(plan)
    }
}
