pub mod grouped_entry;
pub mod grouper;
pub mod grouping_mode;
pub mod title_normalizer;

pub use grouped_entry::GroupedEntry;
pub use grouper::FranchiseGrouper;
pub use grouping_mode::GroupingMode;
pub use title_normalizer::{
    AsciiAlphanumericTransform, LowercaseTransform, NormalizeWhitespaceTransform,
    PatternStripTransform, TitleNormalizer, TitleTransformation,
};
