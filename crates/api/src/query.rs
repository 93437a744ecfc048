//! Query-string parsing for the ad listing endpoint.
//!
//! The listing accepts repeated keys (`?cat=1&cat=2`), so handlers extract
//! raw `(key, value)` pairs and hand them to [`ListingParams::from_pairs`].

use classifieds_core::ad_filter::AdFilter;
use classifieds_core::error::CoreError;
use classifieds_core::pagination::parse_page_number;

use crate::error::AppError;

/// Query parameter carrying the requested page number.
pub const PARAM_PAGE: &str = "page";

/// Parsed `GET /ads` query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingParams {
    pub filter: AdFilter,
    /// `None` when absent or not an integer; resolves to page 1.
    pub page: Option<i64>,
}

impl ListingParams {
    /// Parse filter and page parameters. Malformed filter values are a
    /// `BAD_REQUEST`; a malformed page is silently treated as page 1.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, AppError> {
        let raw = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        let filter = AdFilter::from_query_pairs(raw).map_err(|err| match err {
            CoreError::Validation(msg) => AppError::BadRequest(msg),
            other => AppError::Core(other),
        })?;

        let page = parse_page_number(
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == PARAM_PAGE)
                .map(|(_, v)| v.as_str()),
        );

        Ok(Self { filter, page })
    }
}
