//! Category Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{merge_value, parse_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY name ASC")
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Category> {
        let record = parse_id("category", id)?;
        let category: Option<Category> = self.base.db().select(record).await?;
        category.ok_or_else(|| RepoError::NotFound(format!("Category not found: {id}")))
    }

    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let category = Category {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
        };
        let created: Option<Category> =
            self.base.db().create("category").content(category).await?;
        created
            .ok_or_else(|| RepoError::Database("Category creation returned no record".to_string()))
    }

    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let record = parse_id("category", id)?;
        let updated: Option<Category> = self
            .base
            .db()
            .update(record)
            .merge(merge_value(&data)?)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Category not found: {id}")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Category> {
        let record = parse_id("category", id)?;
        let deleted: Option<Category> = self.base.db().delete(record).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Category not found: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;

    #[tokio::test]
    async fn crud_round_trip() {
        let db = memory_db().await;
        let repo = CategoryRepository::new(db);

        let created = repo
            .create(CategoryCreate {
                name: "Drinks".into(),
                description: None,
            })
            .await
            .unwrap();
        let id = created.id.clone().unwrap().to_string();

        let updated = repo
            .update(
                &id,
                CategoryUpdate {
                    name: None,
                    description: Some("Cold and hot drinks".into()),
                },
            )
            .await
            .unwrap();
        // Unset fields stay untouched
        assert_eq!(updated.name, "Drinks");
        assert_eq!(updated.description, "Cold and hot drinks");

        repo.delete(&id).await.unwrap();
        assert!(matches!(
            repo.find_by_id(&id).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }
}
