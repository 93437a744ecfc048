//! In-memory storage backend.
//!
//! Mirrors the PostgreSQL schema closely enough for the API to behave the
//! same: per-table id sequences, ordering of list queries, cascading deletes
//! and the author join used by ad listings. All state sits behind a single
//! `RwLock`, so every operation is atomic with respect to the others.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use classifieds_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::ad::{Ad, AdListing, CreateAd, UpdateAd};
use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::models::location::{CreateLocation, Location, UpdateLocation};
use crate::models::user::{CreateUser, UpdateUser, User, UserWithLocations};
use crate::store::{AdStore, CategoryStore, LocationStore, UserStore};

/// Rows keyed by id plus the next value of the table's sequence.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<DbId, T>,
    next_id: DbId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> DbId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug)]
struct StoredUser {
    user: User,
    location_ids: Vec<DbId>,
}

#[derive(Debug, Default)]
struct State {
    ads: Table<Ad>,
    categories: Table<Category>,
    users: Table<StoredUser>,
    locations: Table<Location>,
}

impl State {
    fn ad_listing(&self, ad: &Ad) -> Option<AdListing> {
        let author = self.users.rows.get(&ad.author_id)?;
        let mut author_locations: Vec<String> = author
            .location_ids
            .iter()
            .filter_map(|id| self.locations.rows.get(id))
            .map(|l| l.name.clone())
            .collect();
        author_locations.sort();

        Some(AdListing {
            ad: ad.clone(),
            author_first_name: author.user.first_name.clone(),
            author_locations,
        })
    }

    fn user_with_locations(&self, stored: &StoredUser) -> UserWithLocations {
        let mut locations: Vec<&Location> = stored
            .location_ids
            .iter()
            .filter_map(|id| self.locations.rows.get(id))
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        UserWithLocations {
            user: stored.user.clone(),
            location_ids: locations.iter().map(|l| l.id).collect(),
            location_names: locations.iter().map(|l| l.name.clone()).collect(),
        }
    }

    /// Emulates the foreign keys on `ads`.
    fn check_ad_references(&self, author_id: DbId, category_id: DbId) -> Result<(), sqlx::Error> {
        if self.users.rows.contains_key(&author_id)
            && self.categories.rows.contains_key(&category_id)
        {
            Ok(())
        } else {
            Err(sqlx::Error::RowNotFound)
        }
    }

    /// Emulates the foreign key on `user_locations.location_id`.
    fn check_locations(&self, location_ids: &[DbId]) -> Result<(), sqlx::Error> {
        if location_ids
            .iter()
            .all(|id| self.locations.rows.contains_key(id))
        {
            Ok(())
        } else {
            Err(sqlx::Error::RowNotFound)
        }
    }
}

fn dedup_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// In-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdStore for MemoryStore {
    async fn find(&self, id: DbId) -> Result<Option<AdListing>, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state.ads.rows.get(&id).and_then(|ad| state.ad_listing(ad)))
    }

    async fn list(&self) -> Result<Vec<AdListing>, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state
            .ads
            .rows
            .values()
            .filter_map(|ad| state.ad_listing(ad))
            .collect())
    }

    async fn create(&self, input: &CreateAd) -> Result<AdListing, sqlx::Error> {
        let mut state = self.state.write().await;
        state.check_ad_references(input.author_id, input.category_id)?;

        let now = Utc::now();
        let id = state.ads.next_id();
        let ad = Ad {
            id,
            name: input.name.clone(),
            author_id: input.author_id,
            price: input.price,
            description: input.description.clone(),
            is_published: input.is_published,
            category_id: input.category_id,
            image: None,
            created_at: now,
            updated_at: now,
        };
        let listing = state.ad_listing(&ad).ok_or(sqlx::Error::RowNotFound)?;
        state.ads.rows.insert(id, ad);
        Ok(listing)
    }

    async fn update(&self, id: DbId, input: &UpdateAd) -> Result<Option<AdListing>, sqlx::Error> {
        let mut state = self.state.write().await;
        if !state.ads.rows.contains_key(&id) {
            return Ok(None);
        }
        state.check_ad_references(input.author_id, input.category_id)?;

        let Some(ad) = state.ads.rows.get_mut(&id) else {
            return Ok(None);
        };
        ad.name = input.name.clone();
        ad.author_id = input.author_id;
        ad.price = input.price;
        ad.description = input.description.clone();
        ad.category_id = input.category_id;
        ad.updated_at = Utc::now();

        let ad = ad.clone();
        Ok(state.ad_listing(&ad))
    }

    async fn set_image(
        &self,
        id: DbId,
        image: Option<&str>,
    ) -> Result<Option<AdListing>, sqlx::Error> {
        let mut state = self.state.write().await;
        let Some(ad) = state.ads.rows.get_mut(&id) else {
            return Ok(None);
        };
        ad.image = image.map(str::to_string);
        ad.updated_at = Utc::now();

        let ad = ad.clone();
        Ok(state.ad_listing(&ad))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        Ok(state.ads.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn find(&self, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        Ok(self.state.read().await.categories.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, sqlx::Error> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state.categories.rows.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn create(&self, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let category = Category {
            id: state.categories.next_id(),
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };
        state.categories.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let mut state = self.state.write().await;
        Ok(state.categories.rows.get_mut(&id).map(|category| {
            category.name = input.name.clone();
            category.updated_at = Utc::now();
            category.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        if state.categories.rows.remove(&id).is_none() {
            return Ok(false);
        }
        state.ads.rows.retain(|_, ad| ad.category_id != id);
        Ok(true)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find(&self, id: DbId) -> Result<Option<UserWithLocations>, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state
            .users
            .rows
            .get(&id)
            .map(|stored| state.user_with_locations(stored)))
    }

    async fn list(&self) -> Result<Vec<UserWithLocations>, sqlx::Error> {
        let state = self.state.read().await;
        let mut users: Vec<UserWithLocations> = state
            .users
            .rows
            .values()
            .map(|stored| state.user_with_locations(stored))
            .collect();
        users.sort_by(|a, b| {
            a.user
                .user_name
                .cmp(&b.user.user_name)
                .then(a.user.id.cmp(&b.user.id))
        });
        Ok(users)
    }

    async fn create(&self, input: &CreateUser) -> Result<UserWithLocations, sqlx::Error> {
        let mut state = self.state.write().await;
        state.check_locations(&input.location_ids)?;

        let now = Utc::now();
        let id = state.users.next_id();
        let stored = StoredUser {
            user: User {
                id,
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                user_name: input.user_name.clone(),
                password_hash: input.password_hash.clone(),
                role: input.role.as_str().to_string(),
                age: input.age,
                created_at: now,
                updated_at: now,
            },
            location_ids: dedup_ids(&input.location_ids),
        };
        let result = state.user_with_locations(&stored);
        state.users.rows.insert(id, stored);
        Ok(result)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<UserWithLocations>, sqlx::Error> {
        let mut state = self.state.write().await;
        if !state.users.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(location_ids) = &input.location_ids {
            state.check_locations(location_ids)?;
        }

        let Some(stored) = state.users.rows.get_mut(&id) else {
            return Ok(None);
        };
        let user = &mut stored.user;
        if let Some(first_name) = &input.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &input.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(user_name) = &input.user_name {
            user.user_name = user_name.clone();
        }
        if let Some(password_hash) = &input.password_hash {
            user.password_hash = password_hash.clone();
        }
        if let Some(role) = input.role {
            user.role = role.as_str().to_string();
        }
        if let Some(age) = input.age {
            user.age = age;
        }
        user.updated_at = Utc::now();
        if let Some(location_ids) = &input.location_ids {
            stored.location_ids = dedup_ids(location_ids);
        }

        let stored = &state.users.rows[&id];
        Ok(Some(state.user_with_locations(stored)))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        if state.users.rows.remove(&id).is_none() {
            return Ok(false);
        }
        state.ads.rows.retain(|_, ad| ad.author_id != id);
        Ok(true)
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn find(&self, id: DbId) -> Result<Option<Location>, sqlx::Error> {
        Ok(self.state.read().await.locations.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Location>, sqlx::Error> {
        let state = self.state.read().await;
        let mut locations: Vec<Location> = state.locations.rows.values().cloned().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(locations)
    }

    async fn create(&self, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let location = Location {
            id: state.locations.next_id(),
            name: input.name.clone(),
            lat: input.lat,
            lng: input.lng,
            created_at: now,
            updated_at: now,
        };
        state.locations.rows.insert(location.id, location.clone());
        Ok(location)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let mut state = self.state.write().await;
        Ok(state.locations.rows.get_mut(&id).map(|location| {
            if let Some(name) = &input.name {
                location.name = name.clone();
            }
            if let Some(lat) = input.lat {
                location.lat = lat;
            }
            if let Some(lng) = input.lng {
                location.lng = lng;
            }
            location.updated_at = Utc::now();
            location.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        if state.locations.rows.remove(&id).is_none() {
            return Ok(false);
        }
        for stored in state.users.rows.values_mut() {
            stored.location_ids.retain(|location_id| *location_id != id);
        }
        Ok(true)
    }
}
