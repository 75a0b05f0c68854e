use super::SQLxRepo;
use crate::category_repo::CategoryRepoError::{
    CategoryAlreadyExists, CategoryNotFound, SubcategoryAlreadyExists, SubcategoryNotFound,
};
use crate::category_repo::{
    Category, CategoryRepo, CategoryRepoError, NewCategory, NewSubcategory, Subcategory,
};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::error::ErrorKind;
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct CategoryEntry {
    category_id: String,
    name: String,
    user_id: String,
}

impl From<CategoryEntry> for Category {
    fn from(value: CategoryEntry) -> Self {
        Category {
            category_id: value.category_id,
            name: value.name,
            user_id: value.user_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubcategoryEntry {
    subcategory_id: String,
    name: String,
    category_id: String,
}

impl From<SubcategoryEntry> for Subcategory {
    fn from(value: SubcategoryEntry) -> Self {
        Subcategory {
            subcategory_id: value.subcategory_id,
            name: value.name,
            category_id: value.category_id,
        }
    }
}

fn map_category_insert_error(error: sqlx::Error, category_id: &str) -> CategoryRepoError {
    if let sqlx::Error::Database(db_error) = &error {
        if matches!(db_error.kind(), ErrorKind::UniqueViolation) {
            return CategoryAlreadyExists(category_id.to_owned());
        }
    }
    anyhow::Error::new(error)
        .context(format!("Unable to insert category {}", category_id))
        .into()
}

fn map_subcategory_insert_error(
    error: sqlx::Error,
    new_subcategory: &NewSubcategory,
) -> CategoryRepoError {
    if let sqlx::Error::Database(db_error) = &error {
        match db_error.kind() {
            ErrorKind::UniqueViolation => {
                return SubcategoryAlreadyExists(new_subcategory.subcategory_id.clone())
            }
            ErrorKind::ForeignKeyViolation => {
                return CategoryNotFound(new_subcategory.category_id.clone())
            }
            _ => {}
        }
    }
    anyhow::Error::new(error)
        .context(format!(
            "Unable to insert subcategory {}",
            new_subcategory.subcategory_id
        ))
        .into()
}

#[async_trait]
impl CategoryRepo for SQLxRepo {
    #[instrument(skip(self, new_category))]
    async fn create_category(
        &self,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        sqlx::query("INSERT INTO categories (category_id, name, user_id) VALUES ($1, $2, $3)")
            .bind(&new_category.category_id)
            .bind(&new_category.name)
            .bind(&new_category.user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_category_insert_error(e, &new_category.category_id))?;

        Ok(new_category.into_category())
    }

    #[instrument(skip(self))]
    async fn get_category(&self, category_id: &str) -> Result<Category, CategoryRepoError> {
        let entry: Option<CategoryEntry> =
            sqlx::query_as("SELECT category_id, name, user_id FROM categories WHERE category_id = $1")
                .bind(category_id)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Unable to get category {}", category_id))?;

        entry
            .map(Category::from)
            .ok_or_else(|| CategoryNotFound(category_id.to_owned()))
    }

    #[instrument(skip(self))]
    async fn get_categories(&self, user_id: &str) -> Result<Vec<Category>, CategoryRepoError> {
        let entries: Vec<CategoryEntry> = sqlx::query_as(
            "SELECT category_id, name, user_id FROM categories WHERE user_id = $1 ORDER BY category_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get categories for user {}", user_id))?;

        Ok(entries.into_iter().map(Category::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, category_id: &str) -> Result<Category, CategoryRepoError> {
        let entry: Option<CategoryEntry> = sqlx::query_as(
            "DELETE FROM categories WHERE category_id = $1 RETURNING category_id, name, user_id",
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete category {}", category_id))?;

        entry
            .map(Category::from)
            .ok_or_else(|| CategoryNotFound(category_id.to_owned()))
    }

    #[instrument(skip(self, new_subcategory))]
    async fn create_subcategory(
        &self,
        new_subcategory: NewSubcategory,
    ) -> Result<Subcategory, CategoryRepoError> {
        sqlx::query(
            "INSERT INTO subcategories (subcategory_id, name, category_id) VALUES ($1, $2, $3)",
        )
        .bind(&new_subcategory.subcategory_id)
        .bind(&new_subcategory.name)
        .bind(&new_subcategory.category_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_subcategory_insert_error(e, &new_subcategory))?;

        Ok(new_subcategory.into_subcategory())
    }

    #[instrument(skip(self))]
    async fn get_subcategories(
        &self,
        category_id: &str,
    ) -> Result<Vec<Subcategory>, CategoryRepoError> {
        let entries: Vec<SubcategoryEntry> = sqlx::query_as(
            "SELECT subcategory_id, name, category_id FROM subcategories WHERE category_id = $1 ORDER BY subcategory_id",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get subcategories of category {}", category_id))?;

        Ok(entries.into_iter().map(Subcategory::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_subcategory(
        &self,
        subcategory_id: &str,
    ) -> Result<Subcategory, CategoryRepoError> {
        let entry: Option<SubcategoryEntry> = sqlx::query_as(
            "DELETE FROM subcategories WHERE subcategory_id = $1 RETURNING subcategory_id, name, category_id",
        )
        .bind(subcategory_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete subcategory {}", subcategory_id))?;

        entry
            .map(Subcategory::from)
            .ok_or_else(|| SubcategoryNotFound(subcategory_id.to_owned()))
    }
}
