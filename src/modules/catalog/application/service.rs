use std::sync::Arc;

use crate::modules::catalog::domain::{CatalogEntry, CatalogQuery, CatalogRepository, MalId};
use crate::modules::catalog::infrastructure::{CacheStats, JikanAdapter, QueryCache};
use crate::modules::franchise::{FranchiseGrouper, GroupedEntry, GroupingMode};
use crate::shared::config::AppConfig;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::LogContext;

/// Application service for catalog reads
///
/// Responsibilities:
/// - Serve raw catalog results through the query cache
/// - Skip the catalog entirely for blank searches
/// - Fold listings into franchise groups according to the grouping mode
#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn CatalogRepository>,
    cache: Arc<QueryCache>,
    grouper: Arc<FranchiseGrouper>,
}

impl CatalogService {
    pub fn new(
        repository: Arc<dyn CatalogRepository>,
        cache: Arc<QueryCache>,
        grouper: FranchiseGrouper,
    ) -> Self {
        Self {
            repository,
            cache,
            grouper: Arc::new(grouper),
        }
    }

    /// Service backed by Jikan with the configured grouping mode and cache size
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let repository: Arc<dyn CatalogRepository> = Arc::new(JikanAdapter::new(config)?);
        Ok(Self::new(
            repository,
            Arc::new(QueryCache::new(config.cache_max_entries)),
            FranchiseGrouper::new(config.grouping_mode)?,
        ))
    }

    pub fn grouping_mode(&self) -> GroupingMode {
        self.grouper.mode()
    }

    /// Raw entries for a query, served from cache while fresh
    pub async fn fetch(&self, query: &CatalogQuery) -> AppResult<Vec<CatalogEntry>> {
        if !query.is_runnable() {
            log::debug!("Skipping catalog request for {}", query);
            return Ok(Vec::new());
        }

        let key = query.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            log::debug!("Cache HIT for {}", key);
            return Ok(cached);
        }
        log::debug!("Cache MISS for {}", key);

        let entries = self.repository.fetch(query).await?;

        // A missing id is not worth remembering; it may be published later
        let cacheable = !(matches!(query, CatalogQuery::ById { .. }) && entries.is_empty());
        if cacheable {
            self.cache
                .insert(&key, entries.clone(), query.kind().stale_time());
        }

        Ok(entries)
    }

    /// Fetch and group in one step
    pub async fn fetch_grouped(&self, query: &CatalogQuery) -> AppResult<Vec<GroupedEntry>> {
        let entries = self.fetch(query).await?;
        let total = entries.len();
        let groups = self.grouper.group_owned(entries);
        LogContext::grouping(&query.to_string(), total, groups.len());
        Ok(groups)
    }

    /// Highest ranked titles, grouped
    pub async fn top_anime(&self, limit: u32) -> AppResult<Vec<GroupedEntry>> {
        self.fetch_grouped(&CatalogQuery::top(limit)).await
    }

    /// Currently airing titles, grouped
    pub async fn season_now(&self) -> AppResult<Vec<GroupedEntry>> {
        self.fetch_grouped(&CatalogQuery::season_now()).await
    }

    pub async fn season_now_page(&self, page: u32) -> AppResult<Vec<GroupedEntry>> {
        self.fetch_grouped(&CatalogQuery::season_now().with_page(page))
            .await
    }

    /// Free-text search, grouped. A blank query yields an empty list.
    pub async fn search(&self, query: &str) -> AppResult<Vec<GroupedEntry>> {
        self.search_page(query, 1).await
    }

    pub async fn search_page(&self, query: &str, page: u32) -> AppResult<Vec<GroupedEntry>> {
        LogContext::search_operation(query, Some(self.repository.name()), None);
        self.fetch_grouped(&CatalogQuery::search(query).with_page(page))
            .await
    }

    /// Most popular titles, grouped
    pub async fn popular(&self, limit: u32) -> AppResult<Vec<GroupedEntry>> {
        self.fetch_grouped(&CatalogQuery::popular(limit)).await
    }

    /// Single entry by MAL id; never grouped
    pub async fn anime_by_id(&self, id: MalId) -> AppResult<Option<CatalogEntry>> {
        let entries = self.fetch(&CatalogQuery::by_id(id)).await?;
        Ok(entries.into_iter().next())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::domain::repositories::MockCatalogRepository;
    use crate::shared::errors::AppError;

    fn service(mock: MockCatalogRepository, mode: GroupingMode) -> CatalogService {
        CatalogService::new(
            Arc::new(mock),
            Arc::new(QueryCache::new(16)),
            FranchiseGrouper::new(mode).unwrap(),
        )
    }

    fn frieren_pair() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new(1, "Frieren").with_score(9.0),
            CatalogEntry::new(2, "Frieren Season 2").with_score(9.2),
        ]
    }

    #[tokio::test]
    async fn test_blank_search_skips_repository() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_fetch().times(0);
        mock.expect_name().return_const("mock");

        let service = service(mock, GroupingMode::Franchise);
        let groups = service.search("   ").await.unwrap();

        assert!(groups.is_empty());
        assert_eq!(service.cache_stats().entries_count, 0);
    }

    #[tokio::test]
    async fn test_repeated_query_hits_cache() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_fetch()
            .times(1)
            .returning(|_| Ok(frieren_pair()));

        let service = service(mock, GroupingMode::PerEntry);
        let first = service.top_anime(20).await.unwrap();
        let second = service.top_anime(20).await.unwrap();

        assert_eq!(first, second);
        let stats = service.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_franchise_mode_groups_listing() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_fetch().returning(|_| Ok(frieren_pair()));

        let groups = service(mock, GroupingMode::Franchise)
            .season_now()
            .await
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "frieren");
        assert_eq!(groups[0].representative.id, 2);
        assert_eq!(groups[0].member_ids(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mut mock = MockCatalogRepository::new();
        let mut calls = 0;
        mock.expect_fetch().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(AppError::ExternalServiceError("upstream down".to_string()))
            } else {
                Ok(frieren_pair())
            }
        });

        let service = service(mock, GroupingMode::PerEntry);
        assert!(service.popular(10).await.is_err());
        assert_eq!(service.popular(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_cached() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_fetch().times(2).returning(|_| Ok(Vec::new()));

        let service = service(mock, GroupingMode::PerEntry);
        assert_eq!(service.anime_by_id(999_999).await.unwrap(), None);
        assert_eq!(service.anime_by_id(999_999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_anime_by_id_returns_first_entry() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_fetch()
            .withf(|query| *query == CatalogQuery::by_id(52991))
            .returning(|_| Ok(vec![CatalogEntry::new(52991, "Sousou no Frieren")]));

        let entry = service(mock, GroupingMode::Franchise)
            .anime_by_id(52991)
            .await
            .unwrap();
        assert_eq!(entry.map(|e| e.id), Some(52991));
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_fetch().times(2).returning(|_| Ok(frieren_pair()));

        let service = service(mock, GroupingMode::PerEntry);
        service.top_anime(5).await.unwrap();
        service.clear_cache();
        service.top_anime(5).await.unwrap();
    }
}
