pub mod models;
pub mod store;

pub use models::{CatalogFile, CatalogSettings, CategoryInfo, ModelDescriptor, SortBy};
pub use store::{CatalogError, ModelCatalog, SharedModelCatalog};
