use async_trait::async_trait;

use crate::{
    modules::catalog::{
        domain::{CatalogEntry, CatalogQuery, CatalogRepository},
        infrastructure::http_client::{RateLimitClient, RetryPolicy},
    },
    shared::{
        config::AppConfig,
        errors::{AppError, AppResult},
        utils::{LogContext, TimedOperation},
    },
};

use super::mapper::JikanMapper;
use super::models::*;

/// Page size the application requests for search and seasonal listings
const LISTING_PAGE_SIZE: u32 = 20;

/// Jikan (MyAnimeList) catalog adapter over the REST API
pub struct JikanAdapter {
    http_client: RateLimitClient,
    base_url: String,
    mapper: JikanMapper,
}

impl JikanAdapter {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Ok(Self::with_client(
            RateLimitClient::for_jikan(config)?,
            &config.jikan_base_url,
        ))
    }

    /// Create adapter with custom HTTP client (for testing)
    pub fn with_client(http_client: RateLimitClient, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            mapper: JikanMapper::new(),
        }
    }

    /// Check if a request can be made immediately (for testing and monitoring)
    pub fn can_make_request_now(&self) -> bool {
        self.http_client.can_make_request_now()
    }

    /// Endpoint URL for a query, with its query string
    pub fn endpoint(&self, query: &CatalogQuery) -> String {
        match query {
            CatalogQuery::Top { page, limit } => format!(
                "{}/top/anime?page={}&limit={}",
                self.base_url, page, limit
            ),
            CatalogQuery::SeasonNow { page } => format!(
                "{}/seasons/now?page={}&limit={}",
                self.base_url, page, LISTING_PAGE_SIZE
            ),
            CatalogQuery::Search { query, page } => format!(
                "{}/anime?q={}&page={}&limit={}&sfw=true",
                self.base_url,
                urlencoding::encode(query.trim()),
                page,
                LISTING_PAGE_SIZE
            ),
            CatalogQuery::ById { id } => format!("{}/anime/{}", self.base_url, id),
            CatalogQuery::Popular { limit } => format!(
                "{}/top/anime?filter=bypopularity&limit={}",
                self.base_url, limit
            ),
        }
    }

    async fn fetch_list(&self, query: &CatalogQuery, policy: &RetryPolicy) -> AppResult<Vec<CatalogEntry>> {
        let url = self.endpoint(query);
        let response: JikanList<Anime> = self.http_client.get(&url, policy).await?;

        if let Some(pagination) = &response.pagination {
            log::debug!(
                "Jikan: {} page has_next={} last_page={}",
                query,
                pagination.has_next_page,
                pagination.last_visible_page
            );
        }

        Ok(self.mapper.to_catalog_entries(response.data))
    }

    async fn fetch_one(&self, query: &CatalogQuery, policy: &RetryPolicy) -> AppResult<Vec<CatalogEntry>> {
        let url = self.endpoint(query);

        match self.http_client.get::<JikanItem<Anime>>(&url, policy).await {
            Ok(response) => Ok(vec![self.mapper.to_catalog_entry(response.data)]),
            Err(AppError::NotFound(_)) => {
                log::info!("Jikan: No anime found for {}", query);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl CatalogRepository for JikanAdapter {
    async fn fetch(&self, query: &CatalogQuery) -> AppResult<Vec<CatalogEntry>> {
        query.validate()?;

        let policy = RetryPolicy::for_kind(query.kind());
        let timer = TimedOperation::new(&format!("Jikan {}", query));
        LogContext::api_call(self.name(), &query.to_string(), "started", None);

        let result = match query {
            CatalogQuery::ById { .. } => self.fetch_one(query, &policy).await,
            _ => self.fetch_list(query, &policy).await,
        };

        let status = match &result {
            Ok(entries) => format!("returned {} entries", entries.len()),
            Err(e) => {
                LogContext::warn_with_context(e, &format!("Jikan {} failed", query));
                "failed".to_string()
            }
        };
        LogContext::api_call(self.name(), &query.to_string(), &status, Some(timer.finish()));

        if let (CatalogQuery::Search { query: text, .. }, Ok(entries)) = (query, &result) {
            LogContext::search_operation(text, Some(self.name()), Some(entries.len()));
        }

        result
    }

    fn name(&self) -> &'static str {
        "Jikan"
    }
}
