//! Handlers for user locations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use classifieds_core::error::CoreError;
use classifieds_core::types::DbId;
use classifieds_core::validation::{normalize_coordinates, require_non_blank};
use classifieds_db::models::location::{CreateLocation, UpdateLocation};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::projection::LocationResponse;
use crate::response::StatusResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Location",
        id,
    })
}

/// GET /api/v1/locations
pub async fn list_locations(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LocationResponse>>> {
    let locations = state.stores.locations.list().await?;
    Ok(Json(locations.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/locations/{id}
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<LocationResponse>> {
    let location = state
        .stores
        .locations
        .find(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(location.into()))
}

/// POST /api/v1/locations
///
/// Coordinates are range-checked and rounded to six fractional digits.
pub async fn create_location(
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateLocation>,
) -> AppResult<(StatusCode, Json<LocationResponse>)> {
    input.validate()?;
    require_non_blank("name", &input.name)?;
    (input.lat, input.lng) = normalize_coordinates(input.lat, input.lng)?;

    let location = state.stores.locations.create(&input).await?;

    tracing::info!(location_id = location.id, name = %location.name, "Location created");

    Ok((StatusCode::CREATED, Json(location.into())))
}

/// PATCH /api/v1/locations/{id}
///
/// Only the supplied fields change. A lone `lat` or `lng` is checked
/// against the stored value of the other.
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(mut input): AppJson<UpdateLocation>,
) -> AppResult<Json<LocationResponse>> {
    input.validate()?;
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }

    if input.lat.is_some() || input.lng.is_some() {
        let current = state
            .stores
            .locations
            .find(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        let (lat, lng) = normalize_coordinates(
            input.lat.unwrap_or(current.lat),
            input.lng.unwrap_or(current.lng),
        )?;
        input.lat = input.lat.map(|_| lat);
        input.lng = input.lng.map(|_| lng);
    }

    let location = state
        .stores
        .locations
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(location_id = id, "Location updated");

    Ok(Json(location.into()))
}

/// DELETE /api/v1/locations/{id}
///
/// Users linked to the location simply lose it.
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StatusResponse>> {
    if !state.stores.locations.delete(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(location_id = id, "Location deleted");

    Ok(Json(StatusResponse::ok()))
}
