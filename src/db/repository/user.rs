//! User Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{parse_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserId, UserRole};

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a user
    ///
    /// hash_pass 不参与 User 的序列化，这里用显式绑定写入。
    pub async fn create(
        &self,
        username: &str,
        name: &str,
        address: Option<&str>,
        password: &str,
        role: UserRole,
    ) -> RepoResult<User> {
        let hash = User::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;
        let mut result = self
            .base
            .db()
            .query(
                "CREATE user CONTENT {
                    username: $username,
                    name: $name,
                    address: $address,
                    hash_pass: $hash_pass,
                    role: $role,
                    is_active: true
                }",
            )
            .bind(("username", username.to_string()))
            .bind(("name", name.to_string()))
            .bind(("address", address.map(str::to_string)))
            .bind(("hash_pass", hash))
            .bind(("role", role.as_str()))
            .await?;
        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("User creation returned no record".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<User> {
        let record = parse_id("user", id)?;
        let user: Option<User> = self.base.db().select(record).await?;
        user.ok_or_else(|| RepoError::NotFound(format!("User not found: {id}")))
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let user: Option<User> = result.take(0)?;
        Ok(user)
    }

    /// Look up users by id for list joins
    pub async fn find_many(&self, ids: &[UserId]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE id IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM user GROUP ALL")
            .await?;
        #[derive(serde::Deserialize)]
        struct Row {
            count: i64,
        }
        let row: Option<Row> = result.take(0)?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;

    #[tokio::test]
    async fn create_and_login_lookup() {
        let db = memory_db().await;
        let repo = UserRepository::new(db);

        let user = repo
            .create("amy", "Amy", Some("12 High St"), "s3cret", UserRole::User)
            .await
            .unwrap();
        assert!(user.id.is_some());
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active);

        let found = repo.find_by_username("amy").await.unwrap().unwrap();
        assert!(found.verify_password("s3cret").unwrap());
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let db = memory_db().await;
        let repo = UserRepository::new(db);

        repo.create("amy", "Amy", None, "pw", UserRole::User)
            .await
            .unwrap();
        let err = repo
            .create("amy", "Amy Two", None, "pw2", UserRole::User)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
