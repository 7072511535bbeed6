//! Chef Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{merge_value, parse_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{Chef, ChefCreate, ChefUpdate};
use crate::utils::time::now_millis;

#[derive(Clone)]
pub struct ChefRepository {
    base: BaseRepository,
}

impl ChefRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Chef>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM chef ORDER BY created_at DESC")
            .await?;
        let chefs: Vec<Chef> = result.take(0)?;
        Ok(chefs)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Chef> {
        let record = parse_id("chef", id)?;
        let chef: Option<Chef> = self.base.db().select(record).await?;
        chef.ok_or_else(|| RepoError::NotFound(format!("Chef not found: {id}")))
    }

    pub async fn create(&self, data: ChefCreate) -> RepoResult<Chef> {
        let chef = Chef {
            id: None,
            name: data.name,
            specialization: data.specialization,
            experience_years: data.experience_years.unwrap_or(0),
            availability: data.availability.unwrap_or_default(),
            notes: data.notes,
            profile_picture: data.profile_picture,
            created_at: now_millis(),
        };
        let created: Option<Chef> = self.base.db().create("chef").content(chef).await?;
        created.ok_or_else(|| RepoError::Database("Chef creation returned no record".to_string()))
    }

    /// Apply a partial update
    ///
    /// remove_picture 只是 API 控制位，不入库；头像清除走 clear_picture。
    pub async fn update(&self, id: &str, mut data: ChefUpdate) -> RepoResult<Chef> {
        let record = parse_id("chef", id)?;
        data.remove_picture = None;
        let updated: Option<Chef> = self
            .base
            .db()
            .update(record)
            .merge(merge_value(&data)?)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Chef not found: {id}")))
    }

    pub async fn clear_picture(&self, id: &str) -> RepoResult<Chef> {
        let record = parse_id("chef", id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $chef SET profile_picture = NONE RETURN AFTER")
            .bind(("chef", record))
            .await?;
        let updated: Option<Chef> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Chef not found: {id}")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Chef> {
        let record = parse_id("chef", id)?;
        let deleted: Option<Chef> = self.base.db().delete(record).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Chef not found: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::db::models::Specialization;

    #[tokio::test]
    async fn picture_cleared_without_touching_other_fields() {
        let db = memory_db().await;
        let repo = ChefRepository::new(db);

        let chef = repo
            .create(ChefCreate {
                name: "Marco".into(),
                specialization: Some(Specialization::HeadChef),
                experience_years: Some(12),
                availability: None,
                notes: None,
                profile_picture: Some("abc123.jpg".into()),
            })
            .await
            .unwrap();
        let id = chef.id.unwrap().to_string();

        let cleared = repo.clear_picture(&id).await.unwrap();
        assert!(cleared.profile_picture.is_none());
        assert_eq!(cleared.experience_years, 12);
        assert_eq!(cleared.specialization, Some(Specialization::HeadChef));
    }
}
