use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use strum::Display;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    NotFound(String),

    #[error("Email already registered: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Caller-facing classification of a [`UserError`]
///
/// Transports map these onto their own status codes (404, 409, 500, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Unauthorized,
    Forbidden,
    StorageFailure,
    Internal,
}

impl UserError {
    pub fn not_found_id(id: Uuid) -> Self {
        UserError::NotFound(format!("User with ID {id} not found"))
    }

    pub fn not_found_email(email: &str) -> Self {
        UserError::NotFound(format!("User with email {email} not found"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::NotFound(_) => ErrorKind::NotFound,
            UserError::Conflict(_) => ErrorKind::Conflict,
            UserError::Validation(_) => ErrorKind::Validation,
            UserError::InvalidCredentials => ErrorKind::Unauthorized,
            UserError::Forbidden(_) => ErrorKind::Forbidden,
            UserError::PasswordHash(_) => ErrorKind::Internal,
            UserError::Storage(_) => ErrorKind::StorageFailure,
        }
    }
}

/// Unique violations surface as conflicts, everything else as storage failures
impl From<DbErr> for UserError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => UserError::Conflict(detail),
            _ => UserError::Storage(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        UserError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        let id = Uuid::nil();
        assert_eq!(
            UserError::not_found_id(id).to_string(),
            "User with ID 00000000-0000-0000-0000-000000000000 not found"
        );
        assert_eq!(
            UserError::not_found_email("x@example.com").to_string(),
            "User with email x@example.com not found"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(UserError::not_found_id(Uuid::nil()).kind(), ErrorKind::NotFound);
        assert_eq!(UserError::Conflict("a@b.c".into()).kind(), ErrorKind::Conflict);
        assert_eq!(UserError::InvalidCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(UserError::Storage("down".into()).kind(), ErrorKind::StorageFailure);
        assert_eq!(UserError::PasswordHash("bad".into()).kind(), ErrorKind::Internal);
        assert_eq!(ErrorKind::StorageFailure.to_string(), "storage_failure");
    }

    #[test]
    fn test_db_errors_become_storage_failures() {
        let err: UserError = DbErr::Custom("connection refused".to_string()).into();
        assert!(matches!(err, UserError::Storage(ref msg) if msg.contains("connection refused")));
    }
}
