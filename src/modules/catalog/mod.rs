//! Anime catalog access
//!
//! Reads from the public Jikan API through a rate-limited client, caches raw
//! results per query and hands listings to the franchise grouper.
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::CatalogService;
pub use domain::{CatalogEntry, CatalogQuery, CatalogRepository, MalId, QueryKind};
pub use infrastructure::{JikanAdapter, QueryCache};
