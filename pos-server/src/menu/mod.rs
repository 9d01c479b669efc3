//! Menu Catalog - static reference data for order intake

pub mod catalog;

pub use catalog::{MenuCatalog, MenuError};
