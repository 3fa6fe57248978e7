use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserChanges, UserResponse};

/// Persistence boundary for user records
///
/// Reads that feed general callers return [`UserResponse`]; only
/// `create` and `find_by_email` expose the stored hash.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; duplicate emails fail with `Conflict`
    async fn create(&self, user: NewUser) -> UserResult<User>;

    /// Every user, safe projection
    async fn find_all(&self) -> UserResult<Vec<UserResponse>>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<UserResponse>>;

    /// Exact match on the stored email
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Apply `changes` and re-read the row; `None` when no row matched
    async fn update(&self, id: Uuid, changes: UserChanges) -> UserResult<Option<UserResponse>>;

    /// Delete by id; `false` when no row matched
    async fn remove(&self, id: Uuid) -> UserResult<bool>;

    /// Stamp `last_login_at` with the current time
    async fn update_last_login(&self, id: Uuid) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::Conflict(user.email));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
            is_active: user.is_active,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        tracing::debug!(user_id = %user.id, "Stored user in memory");
        Ok(user)
    }

    async fn find_all(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().map(UserResponse::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<UserResponse>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned().map(UserResponse::from))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> UserResult<Option<UserResponse>> {
        let mut users = self.users.write().await;

        if let Some(ref email) = changes.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(UserError::Conflict(email.clone()));
            }
        }

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone().into()))
    }

    async fn remove(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id).is_some())
    }

    async fn update_last_login(&self, id: Uuid) -> UserResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}
