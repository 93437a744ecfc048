pub mod ads;
pub mod categories;
pub mod locations;
pub mod users;

use classifieds_core::error::CoreError;
use classifieds_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Fail with `NOT_FOUND` unless the user exists.
pub(crate) async fn ensure_user_exists(state: &AppState, id: DbId) -> AppResult<()> {
    if state.stores.users.find(id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    Ok(())
}

/// Fail with `NOT_FOUND` unless the category exists.
pub(crate) async fn ensure_category_exists(state: &AppState, id: DbId) -> AppResult<()> {
    if state.stores.categories.find(id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }
    Ok(())
}

/// Delete image files whose rows are already gone. Failures are logged and
/// otherwise ignored.
pub(crate) async fn remove_images(state: &AppState, keys: impl IntoIterator<Item = String>) {
    for key in keys {
        if let Err(e) = state.storage.remove(&key).await {
            tracing::warn!(key = %key, error = %e, "Failed to remove image file");
        }
    }
}

/// Storage keys of every ad matching `pred` that has an image.
pub(crate) async fn image_keys_where(
    state: &AppState,
    pred: impl Fn(&classifieds_db::models::ad::Ad) -> bool,
) -> AppResult<Vec<String>> {
    Ok(state
        .stores
        .ads
        .list()
        .await?
        .into_iter()
        .filter(|listing| pred(&listing.ad))
        .filter_map(|listing| listing.ad.image)
        .collect())
}
