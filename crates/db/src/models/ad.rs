//! Ad entity model and DTOs.

use classifieds_core::ad_filter::FilterableAd;
use classifieds_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// An ad row from the `ads` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Ad {
    pub id: DbId,
    pub name: String,
    pub author_id: DbId,
    pub price: Decimal,
    pub description: String,
    pub is_published: bool,
    pub category_id: DbId,
    /// Storage key of the attached image, if any.
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An ad joined with the author data the listing pipeline and the wire
/// projection need.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AdListing {
    #[sqlx(flatten)]
    pub ad: Ad,
    pub author_first_name: String,
    /// Names of the author's locations, sorted.
    pub author_locations: Vec<String>,
}

impl FilterableAd for AdListing {
    fn category_id(&self) -> DbId {
        self.ad.category_id
    }

    fn author_id(&self) -> DbId {
        self.ad.author_id
    }

    fn name(&self) -> &str {
        &self.ad.name
    }

    fn price(&self) -> Decimal {
        self.ad.price
    }

    fn author_location_names(&self) -> &[String] {
        &self.author_locations
    }
}

/// DTO for creating a new ad. Every field is required.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAd {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub author_id: DbId,
    pub category_id: DbId,
    pub price: Decimal,
    #[validate(length(max = 2000))]
    pub description: String,
    pub is_published: bool,
}

/// DTO for replacing an ad's editable fields.
///
/// `is_published` and the image are not part of an update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAd {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub author_id: DbId,
    pub category_id: DbId,
    pub price: Decimal,
    #[validate(length(max = 2000))]
    pub description: String,
}
