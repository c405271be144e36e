//! Tavily HTTP client and the [`SearchService`] seam.
//!
//! The client holds configuration and a pooled `reqwest::Client` only; it
//! keeps no per-call state, so one instance is shared (behind `Arc`) by
//! every concurrent tool call.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use super::config::ClientConfig;
use super::error::{ApiError, ErrorKind, classify_transport, from_response};
use super::types::{
    ExtractResult, ExtractedPage, FailedUrl, MAX_EXTRACT_URLS, ResultItem, SearchRequest,
    SearchResult, WireExtractRequest, WireExtractResponse, WireSearchResponse, dedup_urls,
    validate_query,
};

/// Token budget used by [`SearchService::get_context`] when none is given.
pub const DEFAULT_CONTEXT_TOKENS: usize = 4000;

/// Operations the tool layer needs from a search backend.
///
/// Implementations perform their own validation, retry and error
/// classification; callers only see the final [`ApiError`].
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Runs a web search.
    ///
    /// # Errors
    ///
    /// `VALIDATION_ERROR` for a bad request (no network call), otherwise
    /// the classified failure of the last attempt.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, ApiError>;

    /// Extracts page content for a batch of URLs.
    ///
    /// Per-URL failures are reported in [`ExtractResult::failed`]; only a
    /// whole-request failure is an error.
    ///
    /// # Errors
    ///
    /// `VALIDATION_ERROR` for an empty list, otherwise the classified
    /// failure of the last attempt.
    async fn extract(&self, urls: &[String]) -> Result<ExtractResult, ApiError>;

    /// Builds a token-bounded JSON context string for RAG prompts.
    ///
    /// # Errors
    ///
    /// Same as [`SearchService::search`].
    async fn get_context(&self, query: &str, max_tokens: Option<usize>)
    -> Result<String, ApiError>;
}

/// HTTP client for the Tavily API.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl TavilyClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns a `NETWORK_ERROR` if the HTTP client cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("tavily-tools/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ApiError::new(
                    ErrorKind::Network,
                    format!("failed to build HTTP client: {e}"),
                )
            })?;
        Ok(Self { http, config })
    }

    /// Creates a client configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns an `AUTH_ERROR` if `TAVILY_API_KEY` is missing or empty.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POSTs `body` to `path`, retrying transient failures.
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}/{path}", self.config.base_url);
        let url = url.as_str();
        self.config
            .retry
            .run(path, |attempt| self.post_once(url, body, attempt))
            .await
    }

    /// A single attempt, classified into an [`ApiError`] on failure.
    async fn post_once<B, R>(&self, url: &str, body: &B, attempt: u32) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned + Send,
    {
        if self.config.verbose {
            info!(url, attempt, "sending Tavily request");
        } else {
            debug!(url, attempt, "sending Tavily request");
        }

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = from_response(status.as_u16(), &text);
            debug!(url, attempt, status = status.as_u16(), kind = %err.kind, "Tavily request failed");
            return Err(err);
        }

        response.json::<R>().await.map_err(|e| classify_transport(&e))
    }
}

#[async_trait]
impl SearchService for TavilyClient {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, ApiError> {
        request.validate()?;
        let wire: WireSearchResponse = self.post("search", request).await?;
        let result = wire.into_result(request);
        if self.config.verbose {
            info!(query = %request.query, results = result.items.len(), "search complete");
        }
        Ok(result)
    }

    async fn extract(&self, urls: &[String]) -> Result<ExtractResult, ApiError> {
        if urls.is_empty() {
            return Err(ApiError::validation("urls must not be empty"));
        }

        let mut unique = dedup_urls(urls);
        let dropped = if unique.len() > MAX_EXTRACT_URLS {
            unique.split_off(MAX_EXTRACT_URLS)
        } else {
            Vec::new()
        };

        let wire: WireExtractResponse = self
            .post("extract", &WireExtractRequest { urls: &unique })
            .await?;
        let result = assemble_extract(&unique, wire, dropped);
        if self.config.verbose {
            info!(
                succeeded = result.succeeded.len(),
                failed = result.failed.len(),
                "extract complete"
            );
        }
        Ok(result)
    }

    async fn get_context(
        &self,
        query: &str,
        max_tokens: Option<usize>,
    ) -> Result<String, ApiError> {
        validate_query(query)?;
        if max_tokens == Some(0) {
            return Err(ApiError::validation("max_tokens must be greater than 0"));
        }

        let request = SearchRequest::new(query);
        let wire: WireSearchResponse = self.post("search", &request).await?;
        let result = wire.into_result(&request);
        Ok(build_context(
            &result.items,
            max_tokens.unwrap_or(DEFAULT_CONTEXT_TOKENS),
        ))
    }
}

/// Orders the service's extract response by the URLs that were sent.
///
/// A URL missing from both `results` and `failed_results` is recorded as
/// failed, so every sent URL lands in exactly one list.
fn assemble_extract(
    sent: &[String],
    wire: WireExtractResponse,
    dropped: Vec<String>,
) -> ExtractResult {
    let mut contents: HashMap<String, String> = HashMap::new();
    for page in wire.results {
        if let Some(content) = page.raw_content {
            contents.entry(page.url).or_insert(content);
        }
    }
    let mut errors: HashMap<String, String> = HashMap::new();
    for failure in wire.failed_results {
        let error = failure
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "extraction failed".to_string());
        errors.entry(failure.url).or_insert(error);
    }

    let mut result = ExtractResult {
        dropped,
        ..ExtractResult::default()
    };
    for url in sent {
        if let Some(raw_content) = take_matching(&mut contents, url) {
            result.succeeded.push(ExtractedPage {
                url: url.clone(),
                raw_content,
            });
        } else {
            let error = take_matching(&mut errors, url)
                .unwrap_or_else(|| "No content returned".to_string());
            result.failed.push(FailedUrl {
                url: url.clone(),
                error,
            });
        }
    }
    result
}

/// Removes the entry for `url`, falling back to a key that parses to the same
/// normalized URL (the service may echo `https://a.example` as `https://a.example/`).
fn take_matching(map: &mut HashMap<String, String>, url: &str) -> Option<String> {
    if let Some(value) = map.remove(url) {
        return Some(value);
    }
    let wanted = normalize_url(url)?;
    let key = map
        .keys()
        .find(|k| normalize_url(k).as_ref() == Some(&wanted))
        .cloned()?;
    map.remove(&key)
}

fn normalize_url(url: &str) -> Option<Url> {
    Url::parse(url.trim()).ok()
}

/// Rough token estimate (4 characters per token).
fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Serializes `{url, content}` entries while they fit in `max_tokens`.
fn build_context(items: &[ResultItem], max_tokens: usize) -> String {
    #[derive(Serialize)]
    struct Entry<'a> {
        url: &'a str,
        content: &'a str,
    }

    let mut used = 0;
    let mut entries = Vec::new();
    for item in items {
        let entry = Entry {
            url: &item.url,
            content: &item.content,
        };
        let cost = estimate_tokens(&serde_json::to_string(&entry).unwrap_or_default());
        if used + cost > max_tokens {
            break;
        }
        used += cost;
        entries.push(entry);
    }
    serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
}
