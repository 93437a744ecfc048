//! User roles.
//!
//! Role names must match the `ck_users_role` check constraint in the
//! `create_users` migration.

use serde::{Deserialize, Serialize};

pub const ROLE_MEMBER: &str = "member";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";

/// Every valid role name.
pub const VALID_ROLES: &[&str] = &[ROLE_MEMBER, ROLE_MODERATOR, ROLE_ADMIN];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Member,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => ROLE_MEMBER,
            Self::Moderator => ROLE_MODERATOR,
            Self::Admin => ROLE_ADMIN,
        }
    }
}
