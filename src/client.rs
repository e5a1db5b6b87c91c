pub mod catalog;

pub use catalog::{CatalogClient, CatalogConfig, CatalogItem};
