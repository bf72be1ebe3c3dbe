//! Franchise grouping of catalog listings
//!
//! Titles are reduced to a base name by [`TitleNormalizer`] and entries
//! sharing that name are folded into one [`GroupedEntry`] by
//! [`FranchiseGrouper`]. [`GroupingMode::PerEntry`] turns bundling off and
//! yields one group per entry.
pub mod domain;

pub use domain::{FranchiseGrouper, GroupedEntry, GroupingMode, TitleNormalizer};
