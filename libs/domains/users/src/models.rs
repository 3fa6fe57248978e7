use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Characters accepted as the "special" class of a password
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Passwords need a lowercase letter, an uppercase letter, a digit and one of `@$!%*?&`
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let strong = password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if !strong {
        return Err(ValidationError::new("weak_password").with_message(
            "must contain uppercase, lowercase, number and special character".into(),
        ));
    }
    Ok(())
}

/// Authorization level of an account
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[default]
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "moderator")]
    Moderator,
}

/// Full stored record, hash included
///
/// Only the credential path reads this shape; everything else works with
/// [`UserResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Safe projection of a user (no password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 2, max = 50))]
    pub name: String,
    #[validate(
        length(min = 8, max = 100),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl CreateUser {
    /// Trim and lowercase the email, trim the name
    pub fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
        self.name = self.name.trim().to_string();
    }
}

/// Partial update input; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 2, max = 50))]
    pub name: Option<String>,
    #[validate(
        length(min = 8, max = 100),
        custom(function = "validate_password_strength")
    )]
    pub password: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UpdateUser {
    pub fn normalize(&mut self) {
        if let Some(email) = self.email.as_mut() {
            *email = normalize_email(email);
        }
        if let Some(name) = self.name.as_mut() {
            *name = name.trim().to_string();
        }
    }
}

/// Insert candidate handed to storage; the password is already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

/// Field changes handed to storage; the password is already hashed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CreateUser {
        CreateUser {
            email: "jane@example.com".to_string(),
            name: "Jane Doe".to_string(),
            password: "Str0ng!Pass".to_string(),
            role: None,
        }
    }

    #[test]
    fn test_role_defaults_to_user() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!(Role::Moderator.to_string(), "moderator");
    }

    #[test]
    fn test_create_user_normalize() {
        let mut input = valid_input();
        input.email = "  Jane@Example.COM ".to_string();
        input.name = "  Jane Doe  ".to_string();
        input.normalize();

        assert_eq!(input.email, "jane@example.com");
        assert_eq!(input.name, "Jane Doe");
    }

    #[test]
    fn test_create_user_valid() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_create_user_rejects_bad_email() {
        let mut input = valid_input();
        input.email = "not-an-email".to_string();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_create_user_rejects_short_name() {
        let mut input = valid_input();
        input.name = "J".to_string();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_create_user_rejects_weak_passwords() {
        for weak in ["short1!", "alllowercase1!", "ALLUPPER1!", "NoDigits!!", "NoSpecial12"] {
            let mut input = valid_input();
            input.password = weak.to_string();
            let errors = input.validate().unwrap_err();
            assert!(
                errors.field_errors().contains_key("password"),
                "{weak} should be rejected"
            );
        }
    }

    #[test]
    fn test_update_user_validates_present_fields_only() {
        assert!(UpdateUser::default().validate().is_ok());

        let update = UpdateUser {
            password: Some("weak".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_update_user_normalize() {
        let mut update = UpdateUser {
            email: Some(" NEW@Example.com".to_string()),
            ..Default::default()
        };
        update.normalize();

        assert_eq!(update.email.as_deref(), Some("new@example.com"));
        assert!(update.name.is_none());
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: "jane@example.com".to_string(),
            name: "Jane Doe".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Admin,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");

        let response = UserResponse::from(user.clone());
        assert_eq!(response.id, user.id);
        assert_eq!(response.role, Role::Admin);
    }
}
