//! Resilient Tavily API client.
//!
//! [`TavilyClient`] wraps the `/search` and `/extract` endpoints with local
//! validation, error classification and exponential backoff. Everything
//! above this module talks to it through the [`SearchService`] trait.

pub mod client;
pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use client::{DEFAULT_CONTEXT_TOKENS, SearchService, TavilyClient};
pub use config::{API_KEY_ENV, ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use error::{ApiError, ErrorKind, classify_status};
pub use retry::RetryPolicy;
pub use types::{
    DEFAULT_MAX_RESULTS, ExtractResult, ExtractedPage, FailedUrl, MAX_EXTRACT_URLS,
    MAX_QUERY_CHARS, MAX_RESULTS_LIMIT, ResultItem, SearchDepth, SearchRequest, SearchResult,
    dedup_urls, validate_query,
};
