//! Anime catalog client with franchise grouping
//!
//! Listings come from the public Jikan API (MyAnimeList data). Sequels and
//! split cours can optionally be folded into a single franchise group so a
//! tier list shows one row per series.
pub mod modules;
pub mod shared;

pub use modules::catalog::{CatalogEntry, CatalogQuery, CatalogService, MalId};
pub use modules::franchise::{FranchiseGrouper, GroupedEntry, GroupingMode, TitleNormalizer};
pub use shared::{AppConfig, AppError, AppResult};
