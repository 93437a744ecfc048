//! Row structs and input DTOs, one module per table.

pub mod ad;
pub mod category;
pub mod location;
pub mod user;
