use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::hashing::{Argon2Hasher, CredentialHasher};
use crate::models::{
    normalize_email, CreateUser, NewUser, UpdateUser, User, UserChanges, UserResponse,
};
use crate::repository::UserRepository;

/// Plaintext behind the hash that unknown-email logins are compared against
const DUMMY_PASSWORD: &str = "unknown-account-placeholder";

/// Service layer for user business logic
///
/// Owns uniqueness checks, password hashing and the mapping of missing
/// records to `NotFound`. Storage failures pass through untouched.
#[derive(Clone)]
pub struct UserService<R: UserRepository, H: CredentialHasher = Argon2Hasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    /// Hashed once on first use, with the same cost as real hashes
    dummy_hash: Arc<OnceCell<String>>,
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: CredentialHasher + 'static,
{
    pub fn new(repository: R, hasher: H) -> Self {
        Self {
            repository: Arc::new(repository),
            hasher: Arc::new(hasher),
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Register a user; the returned record carries the stored hash
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, mut input: CreateUser) -> UserResult<User> {
        input.normalize();
        input.validate()?;

        if self.repository.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::Conflict(input.email));
        }

        let password_hash = self.hash_password(input.password).await?;

        let user = self
            .repository
            .create(NewUser {
                email: input.email,
                name: input.name,
                password_hash,
                role: input.role.unwrap_or_default(),
                is_active: true,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }

    pub async fn find_all(&self) -> UserResult<Vec<UserResponse>> {
        self.repository.find_all().await
    }

    pub async fn find_by_id(&self, id: Uuid) -> UserResult<UserResponse> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::not_found_id(id))
    }

    /// Full record lookup for authentication flows
    pub async fn find_by_email(&self, email: &str) -> UserResult<User> {
        let email = normalize_email(email);
        self.repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| UserError::not_found_email(&email))
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, mut input: UpdateUser) -> UserResult<UserResponse> {
        input.normalize();
        input.validate()?;

        let current = self.find_by_id(id).await?;

        if let Some(ref email) = input.email {
            if *email != current.email && self.repository.find_by_email(email).await?.is_some() {
                return Err(UserError::Conflict(email.clone()));
            }
        }

        let password_hash = match input.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let changes = UserChanges {
            email: input.email,
            name: input.name,
            password_hash,
            role: input.role,
            is_active: input.is_active,
        };

        // Row can vanish between the existence check and the write
        let updated = self
            .repository
            .update(id, changes)
            .await?
            .ok_or_else(|| UserError::not_found_id(id))?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> UserResult<()> {
        self.find_by_id(id).await?;

        if !self.repository.remove(id).await? {
            return Err(UserError::not_found_id(id));
        }

        tracing::info!(user_id = %id, "Removed user");
        Ok(())
    }

    /// Stamp the last login time; unknown ids are a silent no-op
    pub async fn update_last_login(&self, id: Uuid) -> UserResult<()> {
        self.repository.update_last_login(id).await
    }

    /// Check an email/password pair and record the login
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(&self, email: &str, password: &str) -> UserResult<UserResponse> {
        let Some(user) = self
            .repository
            .find_by_email(&normalize_email(email))
            .await?
        else {
            self.compare_against_dummy(password).await;
            return Err(UserError::InvalidCredentials);
        };

        if !self
            .compare_password(password.to_string(), user.password_hash.clone())
            .await?
        {
            tracing::warn!(user_id = %user.id, "Rejected login attempt");
            return Err(UserError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(UserError::Forbidden("Account is inactive".to_string()));
        }

        self.repository.update_last_login(user.id).await?;
        self.find_by_id(user.id).await
    }

    async fn hash_password(&self, password: String) -> UserResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::PasswordHash(e.to_string()))?
    }

    async fn compare_password(&self, password: String, hash: String) -> UserResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.compare(&password, &hash))
            .await
            .map_err(|e| UserError::PasswordHash(e.to_string()))?
    }

    /// Spend one comparison so unknown emails answer as slowly as wrong passwords
    async fn compare_against_dummy(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD.to_string()))
            .await;

        match dummy {
            Ok(hash) => {
                let _ = self
                    .compare_password(password.to_string(), hash.clone())
                    .await;
            }
            Err(e) => tracing::warn!(error = %e, "Could not prepare placeholder hash"),
        }
    }
}
