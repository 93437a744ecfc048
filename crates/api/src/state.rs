use std::sync::Arc;

use classifieds_core::pagination::Paginator;
use classifieds_db::store::Stores;

use crate::config::ServerConfig;
use crate::storage::FileStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (PostgreSQL or in-memory).
    pub stores: Stores,
    /// Where uploaded ad images live.
    pub storage: Arc<dyn FileStorage>,
    /// Page size for ad listings, taken from `PAGE_SIZE`.
    pub paginator: Paginator,
    pub config: Arc<ServerConfig>,
}
