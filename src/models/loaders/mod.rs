pub mod catalog_loader;

pub use catalog_loader::{catalog_path, save_catalog, CatalogLoader, JsonCatalogLoader};
