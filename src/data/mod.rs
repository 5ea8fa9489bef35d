//! Property and catchment data: domain types, feed parsing, async loading.

pub mod catchment;
pub mod loader;
pub mod property;

pub use catchment::{CatchmentDoc, CatchmentFeature, CatchmentTier};
pub use property::{Classification, Property, PropertyCatalog};
