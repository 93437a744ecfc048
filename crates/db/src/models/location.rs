//! Location entity model and DTOs.

use classifieds_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// A location row from the `locations` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Location {
    pub id: DbId,
    pub name: String,
    pub lat: Decimal,
    pub lng: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub lat: Decimal,
    pub lng: Decimal,
}

/// DTO for updating a location. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLocation {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub lat: Option<Decimal>,
    pub lng: Option<Decimal>,
}
