mod catalog_types;
mod property_catalog;

pub use catalog_types::{PropertyRecord, FIELD_NAMES};
pub use property_catalog::Catalog;
