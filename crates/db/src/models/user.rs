//! User entity model and DTOs.

use classifieds_core::roles::UserRole;
use classifieds_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub password_hash: String,
    /// One of the names in `classifieds_core::roles::VALID_ROLES`.
    pub role: String,
    pub age: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user joined with their locations (both lists sorted by location name).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserWithLocations {
    #[sqlx(flatten)]
    pub user: User,
    pub location_ids: Vec<DbId>,
    pub location_names: Vec<String>,
}

/// Input for creating a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub age: i32,
    pub location_ids: Vec<DbId>,
}

/// Input for updating a user. Only `Some` fields are applied; a `Some`
/// location list replaces the existing set.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub age: Option<i32>,
    pub location_ids: Option<Vec<DbId>>,
}
