//! Storage traits the API handlers depend on.
//!
//! Each entity gets a small async trait mirroring its repository. Two
//! backends implement all of them: [`PgStore`] (delegating to the
//! zero-sized repos) and [`MemoryStore`]. [`Stores`] bundles one backend
//! behind trait objects so handlers never know which one is active.
//!
//! Errors stay `sqlx::Error` for both backends so the API layer classifies
//! them in one place.

use std::sync::Arc;

use async_trait::async_trait;
use classifieds_core::types::DbId;

use crate::memory::MemoryStore;
use crate::models::ad::{AdListing, CreateAd, UpdateAd};
use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::models::location::{CreateLocation, Location, UpdateLocation};
use crate::models::user::{CreateUser, UpdateUser, UserWithLocations};
use crate::repositories::{AdRepo, CategoryRepo, LocationRepo, UserRepo};
use crate::DbPool;

#[async_trait]
pub trait AdStore: Send + Sync {
    async fn find(&self, id: DbId) -> Result<Option<AdListing>, sqlx::Error>;

    /// Every ad, ordered by id.
    async fn list(&self) -> Result<Vec<AdListing>, sqlx::Error>;

    async fn create(&self, input: &CreateAd) -> Result<AdListing, sqlx::Error>;

    async fn update(&self, id: DbId, input: &UpdateAd) -> Result<Option<AdListing>, sqlx::Error>;

    /// Set (`Some`) or clear (`None`) the image storage key.
    async fn set_image(
        &self,
        id: DbId,
        image: Option<&str>,
    ) -> Result<Option<AdListing>, sqlx::Error>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find(&self, id: DbId) -> Result<Option<Category>, sqlx::Error>;

    /// Every category, ordered by name.
    async fn list(&self) -> Result<Vec<Category>, sqlx::Error>;

    async fn create(&self, input: &CreateCategory) -> Result<Category, sqlx::Error>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error>;

    /// Removes the category and its ads. Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, id: DbId) -> Result<Option<UserWithLocations>, sqlx::Error>;

    /// Every user, ordered by `user_name`.
    async fn list(&self) -> Result<Vec<UserWithLocations>, sqlx::Error>;

    async fn create(&self, input: &CreateUser) -> Result<UserWithLocations, sqlx::Error>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<UserWithLocations>, sqlx::Error>;

    /// Removes the user and their ads. Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn find(&self, id: DbId) -> Result<Option<Location>, sqlx::Error>;

    /// Every location, ordered by name.
    async fn list(&self) -> Result<Vec<Location>, sqlx::Error>;

    async fn create(&self, input: &CreateLocation) -> Result<Location, sqlx::Error>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error>;

    /// Removes the location from every user. Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;
}

/// One storage backend exposed through every entity trait.
///
/// Cheaply cloneable; all fields point at the same backend.
#[derive(Clone)]
pub struct Stores {
    pub ads: Arc<dyn AdStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub users: Arc<dyn UserStore>,
    pub locations: Arc<dyn LocationStore>,
}

impl Stores {
    /// Back every store with PostgreSQL.
    pub fn postgres(pool: DbPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            ads: store.clone(),
            categories: store.clone(),
            users: store.clone(),
            locations: store,
        }
    }

    /// Back every store with a fresh, empty in-memory database.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            ads: store.clone(),
            categories: store.clone(),
            users: store.clone(),
            locations: store,
        }
    }
}

// ---------------------------------------------------------------------------
// PostgreSQL backend
// ---------------------------------------------------------------------------

/// PostgreSQL backend; each call delegates to the matching repository.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdStore for PgStore {
    async fn find(&self, id: DbId) -> Result<Option<AdListing>, sqlx::Error> {
        AdRepo::find_listing(&self.pool, id).await
    }

    async fn list(&self) -> Result<Vec<AdListing>, sqlx::Error> {
        AdRepo::list_listings(&self.pool).await
    }

    async fn create(&self, input: &CreateAd) -> Result<AdListing, sqlx::Error> {
        AdRepo::create(&self.pool, input).await
    }

    async fn update(&self, id: DbId, input: &UpdateAd) -> Result<Option<AdListing>, sqlx::Error> {
        AdRepo::update(&self.pool, id, input).await
    }

    async fn set_image(
        &self,
        id: DbId,
        image: Option<&str>,
    ) -> Result<Option<AdListing>, sqlx::Error> {
        AdRepo::set_image(&self.pool, id, image).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        AdRepo::delete(&self.pool, id).await
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn find(&self, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        CategoryRepo::find_by_id(&self.pool, id).await
    }

    async fn list(&self) -> Result<Vec<Category>, sqlx::Error> {
        CategoryRepo::list(&self.pool).await
    }

    async fn create(&self, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        CategoryRepo::create(&self.pool, input).await
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        CategoryRepo::update(&self.pool, id, input).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        CategoryRepo::delete(&self.pool, id).await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find(&self, id: DbId) -> Result<Option<UserWithLocations>, sqlx::Error> {
        UserRepo::find_by_id(&self.pool, id).await
    }

    async fn list(&self) -> Result<Vec<UserWithLocations>, sqlx::Error> {
        UserRepo::list(&self.pool).await
    }

    async fn create(&self, input: &CreateUser) -> Result<UserWithLocations, sqlx::Error> {
        UserRepo::create(&self.pool, input).await
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<UserWithLocations>, sqlx::Error> {
        UserRepo::update(&self.pool, id, input).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        UserRepo::delete(&self.pool, id).await
    }
}

#[async_trait]
impl LocationStore for PgStore {
    async fn find(&self, id: DbId) -> Result<Option<Location>, sqlx::Error> {
        LocationRepo::find_by_id(&self.pool, id).await
    }

    async fn list(&self) -> Result<Vec<Location>, sqlx::Error> {
        LocationRepo::list(&self.pool).await
    }

    async fn create(&self, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        LocationRepo::create(&self.pool, input).await
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        LocationRepo::update(&self.pool, id, input).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        LocationRepo::delete(&self.pool, id).await
    }
}
