use super::MemRepo;
use crate::category_repo::CategoryRepoError::{
    CategoryAlreadyExists, CategoryNotFound, SubcategoryAlreadyExists, SubcategoryNotFound,
};
use crate::category_repo::{
    Category, CategoryRepo, CategoryRepoError, NewCategory, NewSubcategory, Subcategory,
};
use async_trait::async_trait;
use std::collections::hash_map::Entry;

#[async_trait]
impl CategoryRepo for MemRepo {
    async fn create_category(
        &self,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        match write_guard.categories.entry(new_category.category_id.clone()) {
            Entry::Occupied(e) => Err(CategoryAlreadyExists(e.key().clone())),
            Entry::Vacant(e) => {
                let category = new_category.into_category();
                e.insert(category.clone());
                Ok(category)
            }
        }
    }

    async fn get_category(&self, category_id: &str) -> Result<Category, CategoryRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .categories
            .get(category_id)
            .cloned()
            .ok_or_else(|| CategoryNotFound(category_id.to_owned()))
    }

    async fn get_categories(&self, user_id: &str) -> Result<Vec<Category>, CategoryRepoError> {
        let read_guard = self.read_lock()?;

        let mut categories: Vec<Category> = read_guard
            .categories
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.category_id.cmp(&b.category_id));
        Ok(categories)
    }

    async fn delete_category(&self, category_id: &str) -> Result<Category, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(category) = write_guard.categories.remove(category_id) else {
            return Err(CategoryNotFound(category_id.to_owned()));
        };

        // cascade to subcategories, set-null on transactions
        write_guard
            .subcategories
            .retain(|_, s| s.category_id != category_id);
        for transaction in write_guard.transactions.values_mut() {
            if transaction.category_id.as_deref() == Some(category_id) {
                transaction.category_id = None;
            }
        }

        Ok(category)
    }

    async fn create_subcategory(
        &self,
        new_subcategory: NewSubcategory,
    ) -> Result<Subcategory, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard
            .categories
            .contains_key(&new_subcategory.category_id)
        {
            return Err(CategoryNotFound(new_subcategory.category_id));
        }

        match write_guard
            .subcategories
            .entry(new_subcategory.subcategory_id.clone())
        {
            Entry::Occupied(e) => Err(SubcategoryAlreadyExists(e.key().clone())),
            Entry::Vacant(e) => {
                let subcategory = new_subcategory.into_subcategory();
                e.insert(subcategory.clone());
                Ok(subcategory)
            }
        }
    }

    async fn get_subcategories(
        &self,
        category_id: &str,
    ) -> Result<Vec<Subcategory>, CategoryRepoError> {
        let read_guard = self.read_lock()?;

        let mut subcategories: Vec<Subcategory> = read_guard
            .subcategories
            .values()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect();
        subcategories.sort_by(|a, b| a.subcategory_id.cmp(&b.subcategory_id));
        Ok(subcategories)
    }

    async fn delete_subcategory(
        &self,
        subcategory_id: &str,
    ) -> Result<Subcategory, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard
            .subcategories
            .remove(subcategory_id)
            .ok_or_else(|| SubcategoryNotFound(subcategory_id.to_owned()))
    }
}
