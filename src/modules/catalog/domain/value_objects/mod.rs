pub mod catalog_query;

pub use catalog_query::{
    CatalogQuery, QueryKind, DEFAULT_LISTING_LIMIT, DEFAULT_POPULAR_LIMIT, MAX_PAGE_SIZE,
};
