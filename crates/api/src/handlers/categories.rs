//! Handlers for ad categories.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use classifieds_core::error::CoreError;
use classifieds_core::types::DbId;
use classifieds_core::validation::require_non_blank;
use classifieds_db::models::category::{CreateCategory, UpdateCategory};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handlers::{image_keys_where, remove_images};
use crate::projection::CategoryResponse;
use crate::response::StatusResponse;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// All categories, sorted by name.
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.stores.categories.list().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state
        .stores
        .categories
        .find(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    Ok(Json(category.into()))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    input.validate()?;
    require_non_blank("name", &input.name)?;

    let category = state.stores.categories.create(&input).await?;

    tracing::info!(category_id = category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// PATCH /api/v1/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateCategory>,
) -> AppResult<Json<CategoryResponse>> {
    input.validate()?;
    require_non_blank("name", &input.name)?;

    let category = state
        .stores
        .categories
        .update(id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    tracing::info!(category_id = id, "Category updated");

    Ok(Json(category.into()))
}

/// DELETE /api/v1/categories/{id}
///
/// Also deletes every ad in the category, including their image files.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StatusResponse>> {
    let orphaned_images = image_keys_where(&state, |ad| ad.category_id == id).await?;

    if !state.stores.categories.delete(id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }
    remove_images(&state, orphaned_images).await;

    tracing::info!(category_id = id, "Category deleted");

    Ok(Json(StatusResponse::ok()))
}
