//! Naming rules for uploaded ad images.

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DbId;

/// Image extensions accepted by the upload endpoint (lowercase).
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Storage prefix for ad images.
pub const AD_IMAGE_PREFIX: &str = "ads";

/// Extract and validate the lowercase extension of an uploaded file name.
pub fn image_extension(filename: &str) -> Result<String, CoreError> {
    let ext = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => {
            return Err(CoreError::Validation(format!(
                "File name '{filename}' has no extension"
            )))
        }
    };

    if SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported image format '.{ext}'. Supported: {}",
            SUPPORTED_IMAGE_EXTENSIONS.join(", ")
        )))
    }
}

/// Build a fresh storage key for an ad image, e.g. `ads/7_3f2a....jpg`.
///
/// Keys are unique per upload so a replaced image never shadows a cached one.
pub fn ad_image_key(ad_id: DbId, ext: &str) -> String {
    format!("{AD_IMAGE_PREFIX}/{ad_id}_{}.{ext}", Uuid::new_v4().simple())
}

/// Join a public base URL and a storage key under `/media`.
pub fn media_url(public_base_url: &str, key: &str) -> String {
    format!(
        "{}/media/{}",
        public_base_url.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}
