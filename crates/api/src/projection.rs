//! Wire representations of the stored records.
//!
//! Projection is pure: it never touches storage, and it only knows how to
//! turn an image key into a URL through the [`FileStorage`] it is given.

use classifieds_core::types::DbId;
use classifieds_db::models::ad::AdListing;
use classifieds_db::models::category::Category;
use classifieds_db::models::location::Location;
use classifieds_db::models::user::UserWithLocations;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::storage::FileStorage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdResponse {
    pub id: DbId,
    pub name: String,
    pub author_id: DbId,
    /// The author's first name.
    pub author: String,
    pub price: Decimal,
    pub description: String,
    pub is_published: bool,
    pub category_id: DbId,
    /// Absolute URL of the image, or `null`.
    pub image: Option<String>,
}

impl AdResponse {
    pub fn project(listing: AdListing, storage: &dyn FileStorage) -> Self {
        let AdListing {
            ad,
            author_first_name,
            ..
        } = listing;

        Self {
            id: ad.id,
            image: ad.image.as_deref().map(|key| storage.url(key)),
            name: ad.name,
            author_id: ad.author_id,
            author: author_first_name,
            price: ad.price,
            description: ad.description,
            is_published: ad.is_published,
            category_id: ad.category_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryResponse {
    pub id: DbId,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// Public view of a user. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub role: String,
    pub age: i32,
    /// Location names, sorted.
    pub locations: Vec<String>,
}

impl From<UserWithLocations> for UserResponse {
    fn from(row: UserWithLocations) -> Self {
        let user = row.user;
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            user_name: user.user_name,
            role: user.role,
            age: user.age,
            locations: row.location_names,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationResponse {
    pub id: DbId,
    pub name: String,
    pub lat: Decimal,
    pub lng: Decimal,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name,
            lat: location.lat,
            lng: location.lng,
        }
    }
}
