//! Handlers for ads: filtered listing, CRUD and image attachment.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use classifieds_core::error::CoreError;
use classifieds_core::media::{ad_image_key, image_extension};
use classifieds_core::types::DbId;
use classifieds_core::validation::{require_non_blank, validate_price};
use classifieds_db::models::ad::{AdListing, CreateAd, UpdateAd};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handlers::{ensure_category_exists, ensure_user_exists, remove_images};
use crate::projection::AdResponse;
use crate::query::ListingParams;
use crate::response::{PageResponse, StatusResponse};
use crate::state::AppState;

/// Multipart field that carries the image file.
pub const IMAGE_FIELD: &str = "image";

async fn find_ad(state: &AppState, id: DbId) -> AppResult<AdListing> {
    state
        .stores
        .ads
        .find(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Ad", id }))
}

/// A body cut off by the upload limit surfaces as a multipart error with a
/// 413 status.
fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the limit of {limit} bytes"))
    } else {
        AppError::BadRequest(err.body_text())
    }
}

fn project(state: &AppState, listing: AdListing) -> AdResponse {
    AdResponse::project(listing, state.storage.as_ref())
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/v1/ads
///
/// Filter every ad by the query parameters, order it as the last applied
/// filter dictates and return one page.
pub async fn list_ads(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PageResponse<AdResponse>>> {
    // Validate before touching storage.
    let params = ListingParams::from_pairs(&pairs)?;

    let listings = state.stores.ads.list().await?;
    let filtered = params.filter.apply(listings);
    let page = state
        .paginator
        .paginate(filtered, params.page)
        .map(|listing| project(&state, listing));

    Ok(Json(page.into()))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/ads/{id}
pub async fn get_ad(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AdResponse>> {
    let listing = find_ad(&state, id).await?;
    Ok(Json(project(&state, listing)))
}

/// POST /api/v1/ads
///
/// Author and category must exist; nothing is written otherwise.
pub async fn create_ad(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateAd>,
) -> AppResult<(StatusCode, Json<AdResponse>)> {
    input.validate()?;
    require_non_blank("name", &input.name)?;
    validate_price(input.price)?;
    ensure_user_exists(&state, input.author_id).await?;
    ensure_category_exists(&state, input.category_id).await?;

    let listing = state.stores.ads.create(&input).await?;

    tracing::info!(
        ad_id = listing.ad.id,
        author_id = listing.ad.author_id,
        category_id = listing.ad.category_id,
        "Ad created",
    );

    Ok((StatusCode::CREATED, Json(project(&state, listing))))
}

/// PATCH /api/v1/ads/{id}
///
/// Replace name, price, description, author and category. The publish flag
/// and image are left alone.
pub async fn update_ad(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateAd>,
) -> AppResult<Json<AdResponse>> {
    input.validate()?;
    require_non_blank("name", &input.name)?;
    validate_price(input.price)?;
    find_ad(&state, id).await?;
    ensure_user_exists(&state, input.author_id).await?;
    ensure_category_exists(&state, input.category_id).await?;

    let listing = state
        .stores
        .ads
        .update(id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Ad", id }))?;

    tracing::info!(ad_id = id, "Ad updated");

    Ok(Json(project(&state, listing)))
}

/// DELETE /api/v1/ads/{id}
pub async fn delete_ad(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StatusResponse>> {
    let listing = find_ad(&state, id).await?;

    if !state.stores.ads.delete(id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Ad", id }));
    }
    remove_images(&state, listing.ad.image).await;

    tracing::info!(ad_id = id, "Ad deleted");

    Ok(Json(StatusResponse::ok()))
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

/// POST /api/v1/ads/{id}/image
///
/// Attach the multipart `image` file to an ad, replacing any previous image.
/// Other fields are ignored; a missing or empty `image` is rejected.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AdResponse>> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let previous = find_ad(&state, id).await?.ad.image;
    let limit = state.config.max_upload_bytes;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("'image' must be a file".to_string()))?;
        let ext = image_extension(&filename)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit))?;
        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded image is empty".to_string()));
        }

        upload = Some((ext, data.to_vec()));
    }

    let Some((ext, data)) = upload else {
        return Err(AppError::BadRequest(format!(
            "Missing '{IMAGE_FIELD}' file field"
        )));
    };

    let key = ad_image_key(id, &ext);
    state
        .storage
        .store(&key, &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store image: {e}")))?;

    let Some(listing) = state.stores.ads.set_image(id, Some(&key)).await? else {
        // The ad vanished between the lookup and the update.
        remove_images(&state, Some(key)).await;
        return Err(AppError::Core(CoreError::NotFound { entity: "Ad", id }));
    };
    remove_images(&state, previous).await;

    tracing::info!(ad_id = id, key = %key, size = data.len(), "Ad image uploaded");

    Ok(Json(project(&state, listing)))
}

/// DELETE /api/v1/ads/{id}/image
///
/// Detach the image from an ad and delete the file.
pub async fn clear_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AdResponse>> {
    let previous = find_ad(&state, id).await?.ad.image;

    let listing = state
        .stores
        .ads
        .set_image(id, None)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Ad", id }))?;
    remove_images(&state, previous).await;

    tracing::info!(ad_id = id, "Ad image cleared");

    Ok(Json(project(&state, listing)))
}
