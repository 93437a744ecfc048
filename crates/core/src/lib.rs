//! Domain logic for the classifieds service.
//!
//! Everything in this crate is pure: no database, no HTTP, no filesystem.
//! The API and repository layers build on these types.

pub mod ad_filter;
pub mod error;
pub mod media;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod validation;
