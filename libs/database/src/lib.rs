//! PostgreSQL connectivity for the identity services
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config(PostgresConfig::from_env()?).await?;
//! postgres::run_migrations::<Migrator>(&db, "identity").await?;
//! ```

pub mod error;
pub mod postgres;

pub use error::{DatabaseError, DatabaseResult};
