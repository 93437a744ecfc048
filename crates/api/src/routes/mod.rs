pub mod ads;
pub mod categories;
pub mod health;
pub mod locations;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ads                        list (?cat, text, location, price_from, price_to, page), create
/// /ads/{id}                   get, update (PATCH), delete
/// /ads/{id}/image             upload (multipart POST), clear (DELETE)
///
/// /categories                 list, create
/// /categories/{id}            get, update (PATCH), delete
///
/// /users                      list, create
/// /users/{id}                 get, update (PATCH), delete
///
/// /locations                  list, create
/// /locations/{id}             get, update (PATCH), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/ads", ads::router())
        .nest("/categories", categories::router())
        .nest("/users", users::router())
        .nest("/locations", locations::router())
}
