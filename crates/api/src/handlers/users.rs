//! Handlers for users (ad authors).
//!
//! Passwords arrive in plaintext, are hashed with Argon2id before they reach
//! the store, and are never returned.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use classifieds_core::error::CoreError;
use classifieds_core::roles::UserRole;
use classifieds_core::types::DbId;
use classifieds_core::validation::{require_non_blank, validate_age};
use classifieds_db::models::user::{CreateUser, UpdateUser};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handlers::{image_keys_where, remove_images};
use crate::password::{hash_password, validate_password_strength};
use crate::projection::UserResponse;
use crate::response::StatusResponse;
use crate::state::AppState;

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100))]
    pub user_name: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    pub age: i32,
    #[serde(default)]
    pub location_ids: Vec<DbId>,
}

/// Request body for `PATCH /api/v1/users/{id}`. Absent fields are kept.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub age: Option<i32>,
    /// Replaces the whole location set when present.
    pub location_ids: Option<Vec<DbId>>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn hash(password: &str) -> AppResult<String> {
    validate_password_strength(password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

async fn ensure_locations_exist(state: &AppState, ids: &[DbId]) -> AppResult<()> {
    for &id in ids {
        if state.stores.locations.find(id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Location",
                id,
            }));
        }
    }
    Ok(())
}

/// GET /api/v1/users
///
/// All users, sorted by `user_name`.
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.stores.users.list().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .stores
        .users
        .find(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(user.into()))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;
    require_non_blank("first_name", &input.first_name)?;
    require_non_blank("last_name", &input.last_name)?;
    require_non_blank("user_name", &input.user_name)?;
    validate_age(input.age)?;
    ensure_locations_exist(&state, &input.location_ids).await?;

    let create_dto = CreateUser {
        password_hash: hash(&input.password)?,
        first_name: input.first_name,
        last_name: input.last_name,
        user_name: input.user_name,
        role: input.role,
        age: input.age,
        location_ids: input.location_ids,
    };

    let user = state.stores.users.create(&create_dto).await?;

    tracing::info!(
        user_id = user.user.id,
        user_name = %user.user.user_name,
        role = %user.user.role,
        "User created",
    );

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PATCH /api/v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;
    for (field, value) in [
        ("first_name", &input.first_name),
        ("last_name", &input.last_name),
        ("user_name", &input.user_name),
    ] {
        if let Some(value) = value {
            require_non_blank(field, value)?;
        }
    }
    if let Some(age) = input.age {
        validate_age(age)?;
    }
    if let Some(ids) = &input.location_ids {
        ensure_locations_exist(&state, ids).await?;
    }

    let update_dto = UpdateUser {
        password_hash: input.password.as_deref().map(hash).transpose()?,
        first_name: input.first_name,
        last_name: input.last_name,
        user_name: input.user_name,
        role: input.role,
        age: input.age,
        location_ids: input.location_ids,
    };

    let user = state
        .stores
        .users
        .update(id, &update_dto)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = id, "User updated");

    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/{id}
///
/// Also deletes every ad the user authored, including their image files.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StatusResponse>> {
    let orphaned_images = image_keys_where(&state, |ad| ad.author_id == id).await?;

    if !state.stores.users.delete(id).await? {
        return Err(not_found(id));
    }
    remove_images(&state, orphaned_images).await;

    tracing::info!(user_id = id, "User deleted");

    Ok(Json(StatusResponse::ok()))
}
