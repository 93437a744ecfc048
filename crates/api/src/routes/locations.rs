use axum::routing::get;
use axum::Router;

use crate::handlers::locations;
use crate::state::AppState;

/// Location routes mounted at `/locations`.
///
/// ```text
/// GET    /                  -> list_locations
/// POST   /                  -> create_location
/// GET    /{id}              -> get_location
/// PATCH  /{id}              -> update_location
/// DELETE /{id}              -> delete_location
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(locations::list_locations).post(locations::create_location))
        .route(
            "/{id}",
            get(locations::get_location)
                .patch(locations::update_location)
                .delete(locations::delete_location),
        )
}
