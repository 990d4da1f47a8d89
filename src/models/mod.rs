pub mod catalog;
pub mod loaders;
pub mod problem;
pub mod submission;
pub mod verdict;

pub use catalog::{Catalog, CatalogModule, CatalogQuestion, Score};
pub use loaders::{catalog_path, save_catalog, CatalogLoader, JsonCatalogLoader};
pub use problem::{Language, ProblemIdentity, ProblemIdentityBuilder, ProblemMeta};
pub use submission::SourceSubmission;
pub use verdict::{AggregateVerdict, OverallStatus, TestCaseVerdict};
