use crate::validation::{self, ValidationError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[async_trait]
pub trait CategoryRepo: Sync + Send {
    async fn create_category(
        &self,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError>;

    async fn get_category(&self, category_id: &str) -> Result<Category, CategoryRepoError>;

    async fn get_categories(&self, user_id: &str) -> Result<Vec<Category>, CategoryRepoError>;

    /// Deletes the category and its subcategories, and clears the category
    /// reference on any transaction that pointed at it.
    async fn delete_category(&self, category_id: &str) -> Result<Category, CategoryRepoError>;

    async fn create_subcategory(
        &self,
        new_subcategory: NewSubcategory,
    ) -> Result<Subcategory, CategoryRepoError>;

    async fn get_subcategories(
        &self,
        category_id: &str,
    ) -> Result<Vec<Subcategory>, CategoryRepoError>;

    async fn delete_subcategory(
        &self,
        subcategory_id: &str,
    ) -> Result<Subcategory, CategoryRepoError>;
}

#[derive(Error, Debug)]
pub enum CategoryRepoError {
    #[error("Category with id {0} not found")]
    CategoryNotFound(String),
    #[error("Category with id {0} already exists")]
    CategoryAlreadyExists(String),
    #[error("Subcategory with id {0} not found")]
    SubcategoryNotFound(String),
    #[error("Subcategory with id {0} already exists")]
    SubcategoryAlreadyExists(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Category {
    pub category_id: String,
    pub name: String,
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Subcategory {
    pub subcategory_id: String,
    pub name: String,
    pub category_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewCategory {
    pub category_id: String,
    pub name: String,
    pub user_id: String,
}

impl NewCategory {
    pub fn validate(fields: &Map<String, Value>) -> Result<NewCategory, ValidationError> {
        Ok(NewCategory {
            category_id: validation::require_text(fields, "category_id")?,
            name: validation::require_text(fields, "name")?,
            user_id: validation::require_text(fields, "user_id")?,
        })
    }

    pub fn into_category(self) -> Category {
        Category {
            category_id: self.category_id,
            name: self.name,
            user_id: self.user_id,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewSubcategory {
    pub subcategory_id: String,
    pub name: String,
    pub category_id: String,
}

impl NewSubcategory {
    pub fn validate(fields: &Map<String, Value>) -> Result<NewSubcategory, ValidationError> {
        Ok(NewSubcategory {
            subcategory_id: validation::require_text(fields, "subcategory_id")?,
            name: validation::require_text(fields, "name")?,
            category_id: validation::require_text(fields, "category_id")?,
        })
    }

    pub fn into_subcategory(self) -> Subcategory {
        Subcategory {
            subcategory_id: self.subcategory_id,
            name: self.name,
            category_id: self.category_id,
        }
    }
}
