use async_trait::async_trait;

use crate::{
    modules::catalog::domain::{entities::CatalogEntry, value_objects::CatalogQuery},
    shared::errors::AppResult,
};

/// Repository interface for the external anime catalog
/// Implementations own transport concerns (rate limiting, retries, wire format)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Run a listing, search or lookup; `ById` yields at most one entry
    async fn fetch(&self, query: &CatalogQuery) -> AppResult<Vec<CatalogEntry>>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}
