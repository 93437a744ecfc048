//! Filter pipeline for ad listings.
//!
//! A listing request may carry any combination of category, text, location
//! and price filters. They are applied one after another in a fixed order:
//!
//! 1. `cat` (repeatable): category id membership, then order by author
//! 2. `text`: case-insensitive substring of the ad name, then order by author
//! 3. `location`: case-insensitive substring of any author location name,
//!    then order by author
//! 4. `price_from`: inclusive lower price bound, then order by price
//! 5. `price_to`: inclusive upper price bound, then order by price
//!
//! Every step re-sorts the working set, so the ordering of the last applied
//! step is the ordering of the result. All sorts are stable: ties keep the
//! order left by the previous step.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::types::DbId;

/// Query parameter carrying a category id (repeatable).
pub const PARAM_CATEGORY: &str = "cat";
/// Query parameter carrying the name substring.
pub const PARAM_TEXT: &str = "text";
/// Query parameter carrying the author location substring.
pub const PARAM_LOCATION: &str = "location";
/// Query parameter carrying the inclusive lower price bound.
pub const PARAM_PRICE_FROM: &str = "price_from";
/// Query parameter carrying the inclusive upper price bound.
pub const PARAM_PRICE_TO: &str = "price_to";

/// Read-only view of an ad as seen by the filter pipeline.
pub trait FilterableAd {
    fn category_id(&self) -> DbId;
    fn author_id(&self) -> DbId;
    fn name(&self) -> &str;
    fn price(&self) -> Decimal;
    /// Names of every location attached to the ad's author.
    fn author_location_names(&self) -> &[String];
}

/// Ordering a filter step imposes on the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdOrdering {
    AuthorId,
    PriceAscending,
}

impl AdOrdering {
    fn sort<T: FilterableAd>(self, items: &mut [T]) {
        match self {
            Self::AuthorId => items.sort_by_key(|ad| ad.author_id()),
            Self::PriceAscending => items.sort_by_key(|ad| ad.price()),
        }
    }
}

/// Parsed listing filters. An empty filter leaves the collection untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdFilter {
    pub categories: Vec<DbId>,
    pub text: Option<String>,
    pub location: Option<String>,
    pub price_from: Option<Decimal>,
    pub price_to: Option<Decimal>,
}

/// A single predicate plus the ordering it leaves behind.
enum Step<'a> {
    Categories(&'a [DbId]),
    Text(String),
    Location(String),
    PriceFrom(Decimal),
    PriceTo(Decimal),
}

impl Step<'_> {
    fn matches<T: FilterableAd>(&self, ad: &T) -> bool {
        match self {
            Step::Categories(ids) => ids.contains(&ad.category_id()),
            Step::Text(needle) => contains_ignore_case(ad.name(), needle),
            Step::Location(needle) => ad
                .author_location_names()
                .iter()
                .any(|name| contains_ignore_case(name, needle)),
            Step::PriceFrom(bound) => ad.price() >= *bound,
            Step::PriceTo(bound) => ad.price() <= *bound,
        }
    }

    fn ordering(&self) -> AdOrdering {
        match self {
            Step::Categories(_) | Step::Text(_) | Step::Location(_) => AdOrdering::AuthorId,
            Step::PriceFrom(_) | Step::PriceTo(_) => AdOrdering::PriceAscending,
        }
    }
}

/// `needle` must already be lowercased.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl AdFilter {
    /// Build a filter from raw query-string pairs.
    ///
    /// Unknown keys are ignored and empty values count as absent. A repeated
    /// `cat` accumulates ids; for the other keys the last value wins.
    /// Malformed category ids or price bounds are rejected rather than
    /// silently dropped.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = AdFilter::default();

        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match key {
                PARAM_CATEGORY => filter.categories.push(parse_category_id(value)?),
                PARAM_TEXT => filter.text = Some(value.to_string()),
                PARAM_LOCATION => filter.location = Some(value.to_string()),
                PARAM_PRICE_FROM => filter.price_from = Some(parse_price(PARAM_PRICE_FROM, value)?),
                PARAM_PRICE_TO => filter.price_to = Some(parse_price(PARAM_PRICE_TO, value)?),
                _ => {}
            }
        }

        Ok(filter)
    }

    /// True when no step would run.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.text.is_none()
            && self.location.is_none()
            && self.price_from.is_none()
            && self.price_to.is_none()
    }

    fn steps(&self) -> Vec<Step<'_>> {
        let mut steps = Vec::with_capacity(5);
        if !self.categories.is_empty() {
            steps.push(Step::Categories(&self.categories));
        }
        if let Some(text) = &self.text {
            steps.push(Step::Text(text.to_lowercase()));
        }
        if let Some(location) = &self.location {
            steps.push(Step::Location(location.to_lowercase()));
        }
        if let Some(bound) = self.price_from {
            steps.push(Step::PriceFrom(bound));
        }
        if let Some(bound) = self.price_to {
            steps.push(Step::PriceTo(bound));
        }
        steps
    }

    /// Run the pipeline over `items`, narrowing and re-ordering after every step.
    pub fn apply<T: FilterableAd>(&self, mut items: Vec<T>) -> Vec<T> {
        for step in self.steps() {
            items.retain(|ad| step.matches(ad));
            step.ordering().sort(&mut items);
        }
        items
    }
}

fn parse_category_id(raw: &str) -> Result<DbId, CoreError> {
    raw.trim().parse::<DbId>().map_err(|_| {
        CoreError::Validation(format!("'{PARAM_CATEGORY}' must be an integer id, got '{raw}'"))
    })
}

fn parse_price(param: &str, raw: &str) -> Result<Decimal, CoreError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| CoreError::Validation(format!("'{param}' must be a number, got '{raw}'")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
