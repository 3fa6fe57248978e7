//! Users Domain
//!
//! Account records with unique emails, hashed passwords and roles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← uniqueness, hashing, NotFound mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────────────┐
//! │ Repository  │     │ CredentialHasher │  ← argon2id
//! └──────┬──────┘     └──────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← entity, DTOs, roles
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::{FromEnv, SecurityConfig};
//! use domain_users::{Argon2Hasher, PgUserRepository, UserService};
//!
//! # async fn example(db: sea_orm::DatabaseConnection) -> Result<(), Box<dyn std::error::Error>> {
//! let hasher = Argon2Hasher::new(&SecurityConfig::from_env()?)?;
//! let service = UserService::new(PgUserRepository::new(db), hasher);
//!
//! let users = service.find_all().await?;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod hashing;
pub mod models;
pub mod permissions;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ErrorKind, UserError, UserResult};
pub use hashing::{Argon2Hasher, CredentialHasher};
pub use models::{CreateUser, NewUser, Role, UpdateUser, User, UserChanges, UserResponse};
pub use permissions::{authorize, Action};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
