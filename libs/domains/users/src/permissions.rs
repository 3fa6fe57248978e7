//! Role checks for user-management actions
//!
//! The service does not enforce these; a transport layer calls
//! [`authorize`] with the caller's role before dispatching.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::{UserError, UserResult};
use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    CreateUser,
    ListUsers,
    ViewUser,
    UpdateUser,
    DeleteUser,
}

impl Role {
    pub fn can(self, action: Action) -> bool {
        match action {
            Action::CreateUser | Action::ViewUser => true,
            Action::ListUsers => matches!(self, Role::Admin | Role::Moderator),
            Action::UpdateUser | Action::DeleteUser => self == Role::Admin,
        }
    }
}

pub fn authorize(role: Role, action: Action) -> UserResult<()> {
    if role.can(action) {
        Ok(())
    } else {
        Err(UserError::Forbidden(format!("role '{role}' cannot {action}")))
    }
}
