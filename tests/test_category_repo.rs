mod utils;

use fintrack_repo::category_repo::CategoryRepoError;
use fintrack_repo::category_repo::NewCategory;
use fintrack_repo::category_repo::NewSubcategory;
use fintrack_repo::mem_repo;

#[tokio::test]
async fn test_create_and_get_category() {
    let repos = mem_repo::create_repos();
    let user = utils::test_user();

    let new_category = utils::new_category(&user);
    let category = repos
        .category_repo
        .create_category(new_category.clone())
        .await
        .unwrap();
    assert_eq!(category.category_id, new_category.category_id);
    assert_eq!(category.name, new_category.name);
    assert_eq!(category.user_id, user);

    let stored_category = repos
        .category_repo
        .get_category(&category.category_id)
        .await
        .unwrap();
    assert_eq!(stored_category, category);
}

#[tokio::test]
async fn test_get_unknown_category() {
    let repos = mem_repo::create_repos();

    let result = repos.category_repo.get_category("missing").await;
    assert!(matches!(
        result.unwrap_err(),
        CategoryRepoError::CategoryNotFound(id) if id == "missing"
    ));
}

#[tokio::test]
async fn test_duplicate_category_rejected() {
    let repos = mem_repo::create_repos();
    let user = utils::test_user();

    let new_category = utils::new_category(&user);
    repos
        .category_repo
        .create_category(new_category.clone())
        .await
        .unwrap();

    let result = repos.category_repo.create_category(new_category).await;
    assert!(matches!(
        result.unwrap_err(),
        CategoryRepoError::CategoryAlreadyExists(_)
    ));
}

#[tokio::test]
async fn test_get_categories_scoped_to_user() {
    let repos = mem_repo::create_repos();
    let user1 = utils::test_user();
    let user2 = utils::test_user();

    let mine = repos
        .category_repo
        .create_category(utils::new_category(&user1))
        .await
        .unwrap();
    repos
        .category_repo
        .create_category(utils::new_category(&user2))
        .await
        .unwrap();

    let categories = repos.category_repo.get_categories(&user1).await.unwrap();
    assert_eq!(categories, vec![mine]);
}

#[tokio::test]
async fn test_subcategory_requires_existing_category() {
    let repos = mem_repo::create_repos();

    let result = repos
        .category_repo
        .create_subcategory(utils::new_subcategory("missing"))
        .await;
    assert!(matches!(
        result.unwrap_err(),
        CategoryRepoError::CategoryNotFound(id) if id == "missing"
    ));
}

#[tokio::test]
async fn test_delete_category_cascades_to_subcategories() {
    let repos = mem_repo::create_repos();

    repos
        .category_repo
        .create_category(NewCategory {
            category_id: "c1".to_owned(),
            name: "Food".to_owned(),
            user_id: "u1".to_owned(),
        })
        .await
        .unwrap();
    repos
        .category_repo
        .create_subcategory(NewSubcategory {
            subcategory_id: "s1".to_owned(),
            name: "Groceries".to_owned(),
            category_id: "c1".to_owned(),
        })
        .await
        .unwrap();

    repos.category_repo.delete_category("c1").await.unwrap();

    let result = repos.category_repo.delete_subcategory("s1").await;
    assert!(matches!(
        result.unwrap_err(),
        CategoryRepoError::SubcategoryNotFound(id) if id == "s1"
    ));
}

#[tokio::test]
async fn test_delete_subcategory_leaves_category() {
    let repos = mem_repo::create_repos();
    let user = utils::test_user();

    let category = repos
        .category_repo
        .create_category(utils::new_category(&user))
        .await
        .unwrap();
    let subcategory = repos
        .category_repo
        .create_subcategory(utils::new_subcategory(&category.category_id))
        .await
        .unwrap();

    repos
        .category_repo
        .delete_subcategory(&subcategory.subcategory_id)
        .await
        .unwrap();

    let subcategories = repos
        .category_repo
        .get_subcategories(&category.category_id)
        .await
        .unwrap();
    assert!(subcategories.is_empty());
    repos
        .category_repo
        .get_category(&category.category_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_subcategories_sorted_by_id() {
    let repos = mem_repo::create_repos();
    let user = utils::test_user();

    let category = repos
        .category_repo
        .create_category(utils::new_category(&user))
        .await
        .unwrap();
    let mut created: Vec<String> = Vec::new();
    for _ in 0..5 {
        let subcategory = repos
            .category_repo
            .create_subcategory(utils::new_subcategory(&category.category_id))
            .await
            .unwrap();
        created.push(subcategory.subcategory_id);
    }
    created.sort();

    let listed: Vec<String> = repos
        .category_repo
        .get_subcategories(&category.category_id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.subcategory_id)
        .collect();
    assert_eq!(listed, created);
}
