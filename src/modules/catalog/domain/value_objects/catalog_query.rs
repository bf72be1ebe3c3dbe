use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::modules::catalog::domain::entities::MalId;
use crate::shared::errors::{AppError, AppResult};

/// Jikan refuses `limit` values above this
pub const MAX_PAGE_SIZE: u32 = 25;
pub const DEFAULT_LISTING_LIMIT: u32 = 20;
pub const DEFAULT_POPULAR_LIMIT: u32 = 10;

/// Class of catalog request; fixes how often it is retried and how long its
/// result may be served from cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKind {
    /// Top, seasonal and popularity listings
    Listing,
    /// Free-text search
    Search,
    /// Single entry lookup
    Detail,
}

impl QueryKind {
    /// Retries after the first failed attempt
    pub fn max_retries(&self) -> u32 {
        match self {
            QueryKind::Listing | QueryKind::Detail => 2,
            QueryKind::Search => 1,
        }
    }

    /// How long a cached result is served before refetching
    pub fn stale_time(&self) -> Duration {
        match self {
            QueryKind::Listing | QueryKind::Detail => Duration::from_secs(5 * 60),
            QueryKind::Search => Duration::from_secs(2 * 60),
        }
    }
}

/// A request against the anime catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogQuery {
    Top { page: u32, limit: u32 },
    SeasonNow { page: u32 },
    Search { query: String, page: u32 },
    ById { id: MalId },
    Popular { limit: u32 },
}

impl CatalogQuery {
    pub fn top(limit: u32) -> Self {
        CatalogQuery::Top {
            page: 1,
            limit: clamp_limit(limit),
        }
    }

    pub fn season_now() -> Self {
        CatalogQuery::SeasonNow { page: 1 }
    }

    pub fn search(query: impl Into<String>) -> Self {
        CatalogQuery::Search {
            query: query.into(),
            page: 1,
        }
    }

    pub fn by_id(id: MalId) -> Self {
        CatalogQuery::ById { id }
    }

    pub fn popular(limit: u32) -> Self {
        CatalogQuery::Popular {
            limit: clamp_limit(limit),
        }
    }

    /// Move a paged query to another page; pages start at 1
    pub fn with_page(self, new_page: u32) -> Self {
        let new_page = new_page.max(1);
        match self {
            CatalogQuery::Top { limit, .. } => CatalogQuery::Top {
                page: new_page,
                limit,
            },
            CatalogQuery::SeasonNow { .. } => CatalogQuery::SeasonNow { page: new_page },
            CatalogQuery::Search { query, .. } => CatalogQuery::Search {
                query,
                page: new_page,
            },
            other => other,
        }
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            CatalogQuery::Top { .. } | CatalogQuery::SeasonNow { .. } | CatalogQuery::Popular { .. } => {
                QueryKind::Listing
            }
            CatalogQuery::Search { .. } => QueryKind::Search,
            CatalogQuery::ById { .. } => QueryKind::Detail,
        }
    }

    /// A search whose text is blank never reaches the catalog
    pub fn is_runnable(&self) -> bool {
        match self {
            CatalogQuery::Search { query, .. } => !query.trim().is_empty(),
            _ => true,
        }
    }

    /// Reject queries the catalog cannot answer
    pub fn validate(&self) -> AppResult<()> {
        match self {
            CatalogQuery::Search { .. } if !self.is_runnable() => Err(AppError::ValidationError(
                "Search query cannot be empty".to_string(),
            )),
            CatalogQuery::ById { id: 0 } => Err(AppError::InvalidInput(
                "MyAnimeList ids start at 1".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Stable key identifying this query in the result cache
    pub fn cache_key(&self) -> String {
        match self {
            CatalogQuery::Top { page, limit } => format!("top:{}:{}", page, limit),
            CatalogQuery::SeasonNow { page } => format!("season-now:{}", page),
            CatalogQuery::Search { query, page } => {
                let mut key = String::with_capacity(query.len() + 12);
                key.push_str("search:");
                for ch in query.trim().chars() {
                    key.extend(ch.to_lowercase());
                }
                key.push(':');
                key.push_str(&page.to_string());
                key
            }
            CatalogQuery::ById { id } => format!("anime:{}", id),
            CatalogQuery::Popular { limit } => format!("popular:{}", limit),
        }
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogQuery::Top { page, limit } => write!(f, "top anime (page {}, limit {})", page, limit),
            CatalogQuery::SeasonNow { page } => write!(f, "current season (page {})", page),
            CatalogQuery::Search { query, page } => write!(f, "search '{}' (page {})", query, page),
            CatalogQuery::ById { id } => write!(f, "anime #{}", id),
            CatalogQuery::Popular { limit } => write!(f, "most popular (limit {})", limit),
        }
    }
}

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_SIZE)
}
