mod utils;

use fintrack_repo::installment_plan_repo::InstallmentPlanRepoError;
use fintrack_repo::mem_repo;
use fintrack_repo::transaction_repo::NewTransaction;
use fintrack_repo::transaction_repo::TransactionRepoError;

#[tokio::test]
async fn test_create_and_get_plan() {
    let repos = mem_repo::create_repos();
    let user = utils::test_user();

    let new_plan = utils::new_plan(&user);
    let plan = repos
        .installment_plan_repo
        .create_plan(new_plan.clone())
        .await
        .unwrap();
    assert_eq!(plan.installment_plan_id, new_plan.installment_plan_id);
    assert_eq!(plan.total_amount, new_plan.total_amount);
    assert_eq!(
        plan.number_of_installments,
        new_plan.number_of_installments
    );
    assert_eq!(plan.start_date, new_plan.start_date);

    let stored_plan = repos
        .installment_plan_repo
        .get_plan(&plan.installment_plan_id)
        .await
        .unwrap();
    assert_eq!(stored_plan, plan);
}

#[tokio::test]
async fn test_duplicate_plan_rejected() {
    let repos = mem_repo::create_repos();
    let user = utils::test_user();

    let new_plan = utils::new_plan(&user);
    repos
        .installment_plan_repo
        .create_plan(new_plan.clone())
        .await
        .unwrap();

    let result = repos.installment_plan_repo.create_plan(new_plan).await;
    assert!(matches!(
        result.unwrap_err(),
        InstallmentPlanRepoError::PlanAlreadyExists(_)
    ));
}

#[tokio::test]
async fn test_get_plans_scoped_to_user() {
    let repos = mem_repo::create_repos();
    let user1 = utils::test_user();
    let user2 = utils::test_user();

    let mine = repos
        .installment_plan_repo
        .create_plan(utils::new_plan(&user1))
        .await
        .unwrap();
    repos
        .installment_plan_repo
        .create_plan(utils::new_plan(&user2))
        .await
        .unwrap();

    let plans = repos.installment_plan_repo.get_plans(&user1).await.unwrap();
    assert_eq!(plans, vec![mine]);
}

#[tokio::test]
async fn test_delete_unreferenced_plan() {
    let repos = mem_repo::create_repos();
    let user = utils::test_user();

    let plan = repos
        .installment_plan_repo
        .create_plan(utils::new_plan(&user))
        .await
        .unwrap();

    repos
        .installment_plan_repo
        .delete_plan(&plan.installment_plan_id)
        .await
        .unwrap();

    let result = repos
        .installment_plan_repo
        .get_plan(&plan.installment_plan_id)
        .await;
    assert!(matches!(
        result.unwrap_err(),
        InstallmentPlanRepoError::PlanNotFound(_)
    ));
}

#[tokio::test]
async fn test_delete_referenced_plan_refused() {
    let repos = mem_repo::create_repos();
    let user = utils::test_user();

    let account = repos
        .account_repo
        .create_account(utils::new_account(&user))
        .await
        .unwrap();
    let plan = repos
        .installment_plan_repo
        .create_plan(utils::new_plan(&user))
        .await
        .unwrap();
    let transaction = repos
        .transaction_repo
        .create_transaction(NewTransaction {
            installment_plan_id: Some(plan.installment_plan_id.clone()),
            installment_number: Some(1),
            ..utils::new_transaction(&account.account_id)
        })
        .await
        .unwrap();

    let result = repos
        .installment_plan_repo
        .delete_plan(&plan.installment_plan_id)
        .await;
    assert!(matches!(
        result.unwrap_err(),
        InstallmentPlanRepoError::PlanInUse(id) if id == plan.installment_plan_id
    ));

    // deleting the referencing transaction unblocks the plan
    repos
        .transaction_repo
        .delete_transaction(&transaction.transaction_id)
        .await
        .unwrap();
    repos
        .installment_plan_repo
        .delete_plan(&plan.installment_plan_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_transaction_requires_existing_plan() {
    let repos = mem_repo::create_repos();
    let user = utils::test_user();

    let account = repos
        .account_repo
        .create_account(utils::new_account(&user))
        .await
        .unwrap();

    let result = repos
        .transaction_repo
        .create_transaction(NewTransaction {
            installment_plan_id: Some("missing".to_owned()),
            installment_number: Some(1),
            ..utils::new_transaction(&account.account_id)
        })
        .await;
    assert!(matches!(
        result.unwrap_err(),
        TransactionRepoError::InstallmentPlanNotFound(id) if id == "missing"
    ));
}
