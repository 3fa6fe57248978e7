use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entity::{self, PROFILE_COLUMNS, ProfileRow},
    error::{UserError, UserResult},
    models::{NewUser, User, UserChanges, UserResponse},
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Unique violation on insert or update reports the email being written
fn unique_violation_error(err: DbErr, email: &str) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::Conflict(email.to_string()),
        _ => err.into(),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: NewUser) -> UserResult<User> {
        let email = user.email.clone();

        let active_model = entity::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(user.email),
            name: Set(user.name),
            password_hash: Set(user.password_hash),
            role: Set(user.role),
            is_active: Set(user.is_active),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| unique_violation_error(e, &email))?;

        tracing::info!(user_id = %model.id, "Inserted user");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> UserResult<Vec<UserResponse>> {
        let rows = entity::Entity::find()
            .select_only()
            .columns(PROFILE_COLUMNS)
            .order_by_asc(entity::Column::CreatedAt)
            .into_model::<ProfileRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<UserResponse>> {
        let row = entity::Entity::find()
            .select_only()
            .columns(PROFILE_COLUMNS)
            .filter(entity::Column::Id.eq(id))
            .into_model::<ProfileRow>()
            .one(&self.db)
            .await?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: Uuid, changes: UserChanges) -> UserResult<Option<UserResponse>> {
        let email = changes.email.clone();
        let mut active_model = entity::ActiveModel {
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        if let Some(email) = changes.email {
            active_model.email = Set(email);
        }
        if let Some(name) = changes.name {
            active_model.name = Set(name);
        }
        if let Some(hash) = changes.password_hash {
            active_model.password_hash = Set(hash);
        }
        if let Some(role) = changes.role {
            active_model.role = Set(role);
        }
        if let Some(is_active) = changes.is_active {
            active_model.is_active = Set(is_active);
        }

        let result = entity::Entity::update_many()
            .set(active_model)
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| match &email {
                Some(email) => unique_violation_error(e, email),
                None => e.into(),
            })?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        tracing::info!(user_id = %id, "Updated user");
        self.find_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: Uuid) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self))]
    async fn update_last_login(&self, id: Uuid) -> UserResult<()> {
        let active_model = entity::ActiveModel {
            last_login_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        entity::Entity::update_many()
            .set(active_model)
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::FixedOffset;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(email: &str) -> entity::Model {
        let now = Utc::now().with_timezone(&FixedOffset::east_opt(0).unwrap());
        entity::Model {
            id: Uuid::now_v7(),
            email: email.to_string(),
            name: "Mock User".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            role: Role::Moderator,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_find_by_email_maps_model() {
        let stored = model("mock@example.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let user = repo.find_by_email("mock@example.com").await.unwrap().unwrap();

        assert_eq!(user.id, stored.id);
        assert_eq!(user.role, Role::Moderator);
        assert_eq!(user.password_hash, "$argon2id$hash");
    }

    #[tokio::test]
    async fn test_update_without_match_returns_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let changes = UserChanges {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(repo.update(Uuid::now_v7(), changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgUserRepository::new(db);
        let id = Uuid::now_v7();

        assert!(repo.remove(id).await.unwrap());
        assert!(!repo.remove(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_storage_errors_surface() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let result = repo.find_all().await;
        assert!(matches!(result, Err(UserError::Storage(_))));
    }

    #[tokio::test]
    async fn test_update_storage_error_is_not_a_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let changes = UserChanges {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        };
        let result = repo.update(Uuid::now_v7(), changes).await;
        assert!(matches!(result, Err(UserError::Storage(_))));
    }
}
