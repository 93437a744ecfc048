//! Field-level domain checks shared by the create and update paths.
//!
//! Length limits live on the DTOs (`validator` derives); the checks here
//! cover numeric ranges and invariants the derive cannot express.

use rust_decimal::Decimal;

use crate::error::CoreError;

/// Fractional digits stored for latitude and longitude.
pub const COORDINATE_SCALE: u32 = 6;

/// Reject names that are empty after trimming.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("'{field}' must not be blank")));
    }
    Ok(())
}

/// Prices are non-negative.
pub fn validate_price(price: Decimal) -> Result<(), CoreError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CoreError::Validation(format!(
            "'price' must not be negative, got {price}"
        )));
    }
    Ok(())
}

/// Ages are non-negative.
pub fn validate_age(age: i32) -> Result<(), CoreError> {
    if age < 0 {
        return Err(CoreError::Validation(format!(
            "'age' must not be negative, got {age}"
        )));
    }
    Ok(())
}

/// Check coordinate ranges and round both to [`COORDINATE_SCALE`] places.
pub fn normalize_coordinates(lat: Decimal, lng: Decimal) -> Result<(Decimal, Decimal), CoreError> {
    if lat < Decimal::from(-90) || lat > Decimal::from(90) {
        return Err(CoreError::Validation(format!(
            "'lat' must be within [-90, 90], got {lat}"
        )));
    }
    if lng < Decimal::from(-180) || lng > Decimal::from(180) {
        return Err(CoreError::Validation(format!(
            "'lng' must be within [-180, 180], got {lng}"
        )));
    }
    Ok((lat.round_dp(COORDINATE_SCALE), lng.round_dp(COORDINATE_SCALE)))
}
