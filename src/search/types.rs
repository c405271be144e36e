//! Request and result types for the Tavily API.
//!
//! Public types are the crate's data model; the `Wire*` types mirror the
//! JSON the service actually sends and are converted at the client edge.

use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// Maximum query length in characters.
pub const MAX_QUERY_CHARS: usize = 1000;
/// Upper bound for `max_results`.
pub const MAX_RESULTS_LIMIT: u32 = 20;
/// Default number of search results.
pub const DEFAULT_MAX_RESULTS: u32 = 5;
/// Maximum unique URLs sent in one extract request.
pub const MAX_EXTRACT_URLS: usize = 20;

/// Search depth accepted by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    /// Fast, single-pass search.
    #[default]
    Basic,
    /// Slower search with deeper content retrieval.
    Advanced,
}

impl SearchDepth {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

impl std::str::FromStr for SearchDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!(
                "invalid search depth '{other}', expected 'basic' or 'advanced'"
            )),
        }
    }
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Query text.
    pub query: String,
    /// Search depth.
    #[serde(rename = "search_depth")]
    pub depth: SearchDepth,
    /// Number of results to return, `1..=20`.
    pub max_results: u32,
    /// Ask the service for a short generated answer.
    pub include_answer: bool,
    /// Include the full page text of each result.
    pub include_raw_content: bool,
    /// Include image URLs.
    pub include_images: bool,
    /// Restrict results to these domains.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
    /// Exclude results from these domains.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_domains: Vec<String>,
}

impl SearchRequest {
    /// Creates a request with default options.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            depth: SearchDepth::Basic,
            max_results: DEFAULT_MAX_RESULTS,
            include_answer: false,
            include_raw_content: false,
            include_images: false,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        }
    }

    /// Sets the search depth.
    #[must_use]
    pub const fn depth(mut self, depth: SearchDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the number of results.
    #[must_use]
    pub const fn max_results(mut self, n: u32) -> Self {
        self.max_results = n;
        self
    }

    /// Requests a generated answer.
    #[must_use]
    pub const fn include_answer(mut self, yes: bool) -> Self {
        self.include_answer = yes;
        self
    }

    /// Requests raw page content.
    #[must_use]
    pub const fn include_raw_content(mut self, yes: bool) -> Self {
        self.include_raw_content = yes;
        self
    }

    /// Requests image URLs.
    #[must_use]
    pub const fn include_images(mut self, yes: bool) -> Self {
        self.include_images = yes;
        self
    }

    /// Restricts results to the given domains.
    #[must_use]
    pub fn include_domains(mut self, domains: Vec<String>) -> Self {
        self.include_domains = domains;
        self
    }

    /// Excludes the given domains.
    #[must_use]
    pub fn exclude_domains(mut self, domains: Vec<String>) -> Self {
        self.exclude_domains = domains;
        self
    }

    /// Checks the request locally, before any network call.
    ///
    /// # Errors
    ///
    /// Returns a `VALIDATION_ERROR` for an empty or oversized query or an
    /// out-of-range `max_results`.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_query(&self.query)?;
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            return Err(ApiError::validation(format!(
                "max_results must be between 1 and {MAX_RESULTS_LIMIT}, got {}",
                self.max_results
            )));
        }
        Ok(())
    }
}

/// Validates a query string shared by search and context calls.
///
/// # Errors
///
/// Returns a `VALIDATION_ERROR` if the query is blank or longer than
/// [`MAX_QUERY_CHARS`] characters.
pub fn validate_query(query: &str) -> Result<(), ApiError> {
    if query.trim().is_empty() {
        return Err(ApiError::validation("query must not be empty"));
    }
    let len = query.chars().count();
    if len > MAX_QUERY_CHARS {
        return Err(ApiError::validation(format!(
            "query is too long ({len} characters, max {MAX_QUERY_CHARS})"
        )));
    }
    Ok(())
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Page title.
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Relevant snippet.
    pub content: String,
    /// Relevance score in `[0.0, 1.0]`.
    pub score: f64,
    /// Full page text, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

/// Outcome of a search call. `items` may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Query echoed by the service.
    pub query: String,
    /// Generated answer, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Hits, in the order the service ranked them.
    pub items: Vec<ResultItem>,
    /// Image URLs, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Server-side processing time.
    pub response_time_seconds: f64,
}

/// Content extracted from one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// Source URL.
    pub url: String,
    /// Extracted page text.
    pub raw_content: String,
}

/// A URL that could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedUrl {
    /// Source URL.
    pub url: String,
    /// Reason reported by the service or by local validation.
    pub error: String,
}

/// Outcome of a batch extract.
///
/// Each unique input URL appears in exactly one of the three lists, in
/// input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResult {
    /// URLs with content.
    pub succeeded: Vec<ExtractedPage>,
    /// URLs that failed.
    pub failed: Vec<FailedUrl>,
    /// URLs beyond the batch limit, never sent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<String>,
}

impl ExtractResult {
    /// Returns `true` if no URL produced content.
    #[must_use]
    pub fn nothing_extracted(&self) -> bool {
        self.succeeded.is_empty()
    }
}

/// Deduplicates URLs keeping the first occurrence of each.
#[must_use]
pub fn dedup_urls(urls: &[String]) -> Vec<String> {
    let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
    let mut unique = Vec::with_capacity(urls.len());
    for url in urls {
        if seen.insert(url.as_str()) {
            unique.push(url.clone());
        }
    }
    unique
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct WireSearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub images: Vec<WireImage>,
    #[serde(default)]
    pub results: Vec<WireResultItem>,
    #[serde(default)]
    pub response_time: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireImage {
    Url(String),
    Described { url: String },
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireResultItem {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub raw_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireExtractRequest<'a> {
    pub urls: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireExtractResponse {
    #[serde(default)]
    pub results: Vec<WireExtracted>,
    #[serde(default)]
    pub failed_results: Vec<WireFailed>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireExtracted {
    pub url: String,
    #[serde(default)]
    pub raw_content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireFailed {
    pub url: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl WireSearchResponse {
    /// Converts to the public model, clamping scores into `[0, 1]`.
    pub(crate) fn into_result(self, request: &SearchRequest) -> SearchResult {
        let response_time_seconds = match self.response_time {
            Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(serde_json::Value::String(s)) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        };
        let images = request.include_images.then(|| {
            self.images
                .into_iter()
                .map(|img| match img {
                    WireImage::Url(url) | WireImage::Described { url } => url,
                })
                .collect()
        });
        SearchResult {
            query: if self.query.is_empty() {
                request.query.clone()
            } else {
                self.query
            },
            answer: self.answer.filter(|a| !a.trim().is_empty()),
            items: self
                .results
                .into_iter()
                .map(|r| ResultItem {
                    title: r.title,
                    url: r.url,
                    content: r.content,
                    score: if r.score.is_finite() {
                        r.score.clamp(0.0, 1.0)
                    } else {
                        0.0
                    },
                    raw_content: r.raw_content,
                })
                .collect(),
            images,
            response_time_seconds,
        }
    }
}
