pub mod adapters;
pub mod cache;
pub mod http_client;

pub use adapters::JikanAdapter;
pub use cache::{CacheStats, QueryCache};
pub use http_client::{RateLimitClient, RetryPolicy};
