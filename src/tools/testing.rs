//! In-memory [`SearchService`] for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::search::{
    ApiError, ExtractResult, ExtractedPage, FailedUrl, MAX_EXTRACT_URLS, ResultItem,
    SearchRequest, SearchResult, SearchService, dedup_urls, validate_query,
};

/// Records every call and answers with canned data.
///
/// Extract mirrors the real client's batching: URLs are deduplicated, the
/// first 20 are "sent", and any URL containing `fail` comes back failed.
#[derive(Default)]
pub(crate) struct MockSearchService {
    items: usize,
    error: Option<ApiError>,
    pub(crate) search_calls: Mutex<Vec<SearchRequest>>,
    pub(crate) extract_calls: Mutex<Vec<Vec<String>>>,
    pub(crate) context_calls: Mutex<Vec<(String, Option<usize>)>>,
}

impl MockSearchService {
    pub(crate) fn with_items(items: usize) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub(crate) fn failing(error: ApiError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub(crate) fn search_count(&self) -> usize {
        self.search_calls.lock().map_or(0, |c| c.len())
    }

    pub(crate) fn extract_batches(&self) -> Vec<Vec<String>> {
        self.extract_calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub(crate) fn context_count(&self) -> usize {
        self.context_calls.lock().map_or(0, |c| c.len())
    }

    fn fail(&self) -> Result<(), ApiError> {
        self.error.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl SearchService for MockSearchService {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, ApiError> {
        request.validate()?;
        if let Ok(mut calls) = self.search_calls.lock() {
            calls.push(request.clone());
        }
        self.fail()?;
        let count = self.items.min(request.max_results as usize);
        Ok(SearchResult {
            query: request.query.clone(),
            answer: None,
            items: (1..=count)
                .map(|i| ResultItem {
                    title: format!("Result {i}"),
                    url: format!("https://example.com/{i}"),
                    content: format!("Snippet {i}"),
                    score: 1.0 / f64::from(u32::try_from(i).unwrap_or(1)),
                    raw_content: None,
                })
                .collect(),
            images: None,
            response_time_seconds: 0.1,
        })
    }

    async fn extract(&self, urls: &[String]) -> Result<ExtractResult, ApiError> {
        if urls.is_empty() {
            return Err(ApiError::validation("urls must not be empty"));
        }
        let mut sent = dedup_urls(urls);
        let dropped = if sent.len() > MAX_EXTRACT_URLS {
            sent.split_off(MAX_EXTRACT_URLS)
        } else {
            Vec::new()
        };
        if let Ok(mut calls) = self.extract_calls.lock() {
            calls.push(sent.clone());
        }
        self.fail()?;

        let mut result = ExtractResult {
            dropped,
            ..ExtractResult::default()
        };
        for url in sent {
            if url.contains("fail") {
                result.failed.push(FailedUrl {
                    url,
                    error: "HTTP 404".to_string(),
                });
            } else {
                let raw_content = format!("content of {url}");
                result.succeeded.push(ExtractedPage { url, raw_content });
            }
        }
        Ok(result)
    }

    async fn get_context(
        &self,
        query: &str,
        max_tokens: Option<usize>,
    ) -> Result<String, ApiError> {
        validate_query(query)?;
        if let Ok(mut calls) = self.context_calls.lock() {
            calls.push((query.to_string(), max_tokens));
        }
        self.fail()?;
        Ok(r#"[{"url":"https://example.com/1","content":"Snippet 1"}]"#.to_string())
    }
}
