//! Route definitions for ads, mounted at `/ads`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ads;
use crate::state::AppState;

/// ```text
/// GET    /                  -> list_ads
/// POST   /                  -> create_ad
/// GET    /{id}              -> get_ad
/// PATCH  /{id}              -> update_ad
/// DELETE /{id}              -> delete_ad
/// POST   /{id}/image        -> upload_image (multipart)
/// DELETE /{id}/image        -> clear_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ads::list_ads).post(ads::create_ad))
        .route(
            "/{id}",
            get(ads::get_ad)
                .patch(ads::update_ad)
                .delete(ads::delete_ad),
        )
        .route(
            "/{id}/image",
            post(ads::upload_image).delete(ads::clear_image),
        )
}
