//! The three tools over a shared [`SearchService`].
//!
//! Misuse (blank query, empty URL list, bad arguments) is a [`ToolError`].
//! Every service failure is rendered into the returned text instead, so an
//! agent never sees a crash for a remote problem.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::ToolError;
use crate::search::{
    ExtractResult, FailedUrl, MAX_EXTRACT_URLS, SearchRequest, SearchService, dedup_urls,
};

use super::definition::{CONTEXT_TOOL, EXTRACT_TOOL, SEARCH_TOOL, ToolSet};
use super::format::{render_api_error, render_context, render_extract, render_search};
use super::params::{ContextToolParams, ExtractToolParams, SearchToolParams};

/// Failure text recorded for URLs rejected before any request.
pub const INVALID_URL_ERROR: &str = "Invalid URL: expected an absolute http(s) URL with a host";

/// Search, extract and context tools bound to one service.
///
/// Cheap to share: hosts hold it behind an `Arc` and call it concurrently.
#[derive(Clone)]
pub struct ToolsCapability {
    service: Arc<dyn SearchService>,
}

impl std::fmt::Debug for ToolsCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolsCapability")
            .field("service", &self.service.name())
            .finish()
    }
}

impl ToolsCapability {
    /// Binds the tools to a search service.
    #[must_use]
    pub fn new(service: Arc<dyn SearchService>) -> Self {
        Self { service }
    }

    /// Definitions of the tools this capability serves.
    #[must_use]
    pub fn definitions(&self) -> ToolSet {
        ToolSet::search_tools()
    }

    /// Runs a web search and renders the ranked results.
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidInput`] for a blank query.
    pub async fn search(&self, params: SearchToolParams) -> Result<String, ToolError> {
        if params.query.trim().is_empty() {
            return Err(ToolError::invalid_input(SEARCH_TOOL, "query must not be empty"));
        }
        debug!(
            backend = self.service.name(),
            query = %params.query,
            depth = %params.search_depth,
            max_results = params.max_results,
            "search tool"
        );

        let request = SearchRequest::new(params.query)
            .depth(params.search_depth)
            .max_results(params.max_results);
        Ok(match self.service.search(&request).await {
            Ok(result) => render_search(&result),
            Err(err) => render_api_error(&err),
        })
    }

    /// Extracts page content for a list of URLs.
    ///
    /// URLs are deduplicated; malformed ones are reported as failed without
    /// a request, and only the first 20 eligible URLs are sent.
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidInput`] for an empty list.
    pub async fn extract(&self, params: ExtractToolParams) -> Result<String, ToolError> {
        if params.urls.is_empty() {
            return Err(ToolError::invalid_input(EXTRACT_TOOL, "urls must not be empty"));
        }

        let unique = dedup_urls(&params.urls);
        let (eligible, rejected): (Vec<String>, Vec<String>) =
            unique.iter().cloned().partition(|u| is_extractable(u));
        debug!(
            backend = self.service.name(),
            eligible = eligible.len(),
            rejected = rejected.len(),
            "extract tool"
        );

        let mut result = if eligible.is_empty() {
            ExtractResult::default()
        } else {
            match self.service.extract(&eligible).await {
                Ok(result) => result,
                Err(err) => return Ok(render_api_error(&err)),
            }
        };

        if !result.dropped.is_empty() {
            warn!(
                dropped = result.dropped.len(),
                limit = MAX_EXTRACT_URLS,
                "extract batch limit exceeded, skipping excess URLs"
            );
        }

        result.failed.extend(rejected.into_iter().map(|url| FailedUrl {
            url,
            error: INVALID_URL_ERROR.to_string(),
        }));
        let position: HashMap<&str, usize> = unique
            .iter()
            .enumerate()
            .map(|(i, u)| (u.as_str(), i))
            .collect();
        result
            .failed
            .sort_by_key(|f| position.get(f.url.as_str()).copied().unwrap_or(usize::MAX));

        Ok(render_extract(&result))
    }

    /// Builds a token-bounded context string for a topic.
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidInput`] for a blank query.
    pub async fn context(&self, params: ContextToolParams) -> Result<String, ToolError> {
        if params.query.trim().is_empty() {
            return Err(ToolError::invalid_input(CONTEXT_TOOL, "query must not be empty"));
        }
        debug!(backend = self.service.name(), query = %params.query, max_tokens = ?params.max_tokens, "context tool");

        Ok(
            match self
                .service
                .get_context(&params.query, params.max_tokens)
                .await
            {
                Ok(context) => render_context(&params.query, &context),
                Err(err) => render_api_error(&err),
            },
        )
    }

    /// Decodes JSON arguments and dispatches by tool name.
    ///
    /// # Errors
    ///
    /// [`ToolError::UnknownTool`], [`ToolError::InvalidArguments`], or the
    /// tool's own misuse error.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<String, ToolError> {
        match name {
            SEARCH_TOOL => self.search(decode(name, arguments)?).await,
            EXTRACT_TOOL => self.extract(decode(name, arguments)?).await,
            CONTEXT_TOOL => self.context(decode(name, arguments)?).await,
            other => Err(ToolError::UnknownTool {
                name: other.to_string(),
            }),
        }
    }
}

fn decode<T: DeserializeOwned>(tool: &str, arguments: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Absolute `http`/`https` URL with a non-empty host.
fn is_extractable(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|u| {
        matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{ApiError, ErrorKind};
    use crate::tools::testing::MockSearchService;
    use serde_json::json;
    use test_case::test_case;

    fn capability(mock: &Arc<MockSearchService>) -> ToolsCapability {
        ToolsCapability::new(Arc::clone(mock) as Arc<dyn SearchService>)
    }

    #[tokio::test]
    async fn test_search_renders_results() {
        let mock = Arc::new(MockSearchService::with_items(2));
        let text = capability(&mock)
            .search(SearchToolParams::new("rust"))
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(text.starts_with("Search results for: rust\n\n1. Result 1"));
        assert!(text.contains("   Score: 0.50"));
        assert_eq!(mock.search_count(), 1);
    }

    #[tokio::test]
    async fn test_search_zero_items_renders_no_results() {
        let mock = Arc::new(MockSearchService::with_items(0));
        let text = capability(&mock)
            .search(SearchToolParams::new("obscure"))
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(text, "Search results for: obscure\n\nNo results found.");
    }

    #[test_case("" ; "empty")]
    #[test_case("   \n" ; "whitespace")]
    fn test_blank_query_is_misuse(query: &str) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap_or_else(|_| unreachable!());
        let mock = Arc::new(MockSearchService::with_items(1));
        let cap = capability(&mock);

        let search = rt.block_on(cap.search(SearchToolParams::new(query)));
        assert!(matches!(search, Err(ToolError::InvalidInput { .. })));
        let context = rt.block_on(cap.context(ContextToolParams {
            query: query.to_string(),
            max_tokens: None,
        }));
        assert!(matches!(context, Err(ToolError::InvalidInput { .. })));
        assert_eq!(mock.search_count(), 0);
        assert_eq!(mock.context_count(), 0);
    }

    #[test_case(0 ; "zero")]
    #[test_case(21 ; "above limit")]
    fn test_out_of_range_max_results_renders_validation(max_results: u32) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap_or_else(|_| unreachable!());
        let mock = Arc::new(MockSearchService::with_items(1));
        let mut params = SearchToolParams::new("q");
        params.max_results = max_results;

        let text = rt
            .block_on(capability(&mock).search(params))
            .unwrap_or_else(|_| unreachable!());
        assert!(text.starts_with("Tavily error: max_results must be between 1 and 20"));
        assert!(text.ends_with("(type: VALIDATION_ERROR)"));
        assert_eq!(mock.search_count(), 0);
    }

    #[tokio::test]
    async fn test_service_failure_is_rendered() {
        let err = ApiError::new(ErrorKind::RateLimit, "slow down").with_attempts(4);
        let mock = Arc::new(MockSearchService::failing(err));
        let text = capability(&mock)
            .search(SearchToolParams::new("q"))
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(
            text,
            "Tavily error: slow down (after 4 attempts) (type: RATE_LIMIT_ERROR)"
        );
    }

    #[tokio::test]
    async fn test_extract_empty_urls_is_misuse() {
        let mock = Arc::new(MockSearchService::default());
        let result = capability(&mock)
            .extract(ExtractToolParams { urls: Vec::new() })
            .await;
        assert!(matches!(result, Err(ToolError::InvalidInput { .. })));
        assert!(mock.extract_batches().is_empty());
    }

    #[tokio::test]
    async fn test_extract_dedupes_and_prevalidates() {
        let mock = Arc::new(MockSearchService::default());
        let urls = ["https://a", "https://a", "not-a-url", "https://b"]
            .map(str::to_string)
            .to_vec();
        let text = capability(&mock)
            .extract(ExtractToolParams { urls })
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            mock.extract_batches(),
            vec![vec!["https://a".to_string(), "https://b".to_string()]]
        );
        assert!(text.starts_with("Extracted content from 2 URL(s):"));
        assert_eq!(text.matches("## https://a").count(), 1);
        assert!(text.contains(&format!("Failed URLs:\n- not-a-url: {INVALID_URL_ERROR}")));
    }

    #[tokio::test]
    async fn test_extract_failed_urls_keep_input_order() {
        let mock = Arc::new(MockSearchService::default());
        let urls = ["https://fail-one", "ftp://files", "https://ok", "https://fail-two"]
            .map(str::to_string)
            .to_vec();
        let text = capability(&mock)
            .extract(ExtractToolParams { urls })
            .await
            .unwrap_or_else(|_| unreachable!());
        let failed = text
            .split("Failed URLs:\n")
            .nth(1)
            .unwrap_or_default()
            .lines()
            .collect::<Vec<_>>();
        let rejected = format!("- ftp://files: {INVALID_URL_ERROR}");
        assert_eq!(
            failed,
            vec![
                "- https://fail-one: HTTP 404",
                rejected.as_str(),
                "- https://fail-two: HTTP 404",
            ]
        );
    }

    #[tokio::test]
    async fn test_extract_all_invalid_makes_no_request() {
        let mock = Arc::new(MockSearchService::default());
        let urls = vec!["mailto:a@b.c".to_string(), "/relative".to_string()];
        let text = capability(&mock)
            .extract(ExtractToolParams { urls })
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(mock.extract_batches().is_empty());
        assert!(text.starts_with("No content could be extracted from the provided URLs."));
    }

    #[tokio::test]
    async fn test_extract_truncates_to_batch_limit() {
        let mock = Arc::new(MockSearchService::default());
        let urls: Vec<String> = (0..25).map(|i| format!("https://site{i}.example")).collect();
        let text = capability(&mock)
            .extract(ExtractToolParams { urls: urls.clone() })
            .await
            .unwrap_or_else(|_| unreachable!());

        let batches = mock.extract_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], urls[..20].to_vec());
        assert!(text.starts_with("Extracted content from 20 URL(s):"));
        assert!(!text.contains("Failed URLs:"));
        let skipped = text
            .split("Skipped URLs (batch limit of 20 exceeded):\n")
            .nth(1)
            .unwrap_or_default();
        assert_eq!(skipped.lines().count(), 5);
        assert!(skipped.starts_with("- https://site20.example"));
    }

    #[tokio::test]
    async fn test_context_renders_heading() {
        let mock = Arc::new(MockSearchService::default());
        let text = capability(&mock)
            .context(ContextToolParams {
                query: "tokio".to_string(),
                max_tokens: Some(100),
            })
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(text.starts_with("Search context for: tokio\n\n[{"));
    }

    #[tokio::test]
    async fn test_invoke_dispatch_and_errors() {
        let mock = Arc::new(MockSearchService::with_items(1));
        let cap = capability(&mock);

        let text = cap
            .invoke("search", json!({"query": "q", "max_results": 1}))
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(text.contains("1. Result 1"));

        let unknown = cap.invoke("crawl", json!({})).await;
        assert!(matches!(unknown, Err(ToolError::UnknownTool { .. })));

        let bad = cap.invoke("extract", json!({"urls": "https://a"})).await;
        assert!(matches!(bad, Err(ToolError::InvalidArguments { .. })));
    }

    #[test_case("https://example.com/page", true ; "https")]
    #[test_case("http://localhost:8080", true ; "http with port")]
    #[test_case("ftp://example.com", false ; "wrong scheme")]
    #[test_case("example.com", false ; "no scheme")]
    #[test_case("file:///etc/hosts", false ; "no host")]
    fn test_is_extractable(url: &str, expected: bool) {
        assert_eq!(is_extractable(url), expected);
    }
}
