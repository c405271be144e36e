//! Text rendering for tool output.
//!
//! Agents read these strings as natural-language context, so the layout is
//! fixed and identical across the direct and MCP exposures.

use std::fmt::Write as FmtWrite;

use crate::search::{ApiError, ExtractResult, MAX_EXTRACT_URLS, SearchResult};

/// Rendered when a search returns no items.
pub const NO_RESULTS: &str = "No results found.";
/// Rendered in place of the success section when no URL produced content.
pub const NOTHING_EXTRACTED: &str = "No content could be extracted from the provided URLs.";

/// Renders a search result as a numbered list.
#[must_use]
pub fn render_search(result: &SearchResult) -> String {
    let mut sections = vec![format!("Search results for: {}", result.query)];

    if let Some(answer) = &result.answer {
        sections.push(format!("Answer: {answer}"));
    }

    if result.items.is_empty() {
        sections.push(NO_RESULTS.to_string());
    }
    for (i, item) in result.items.iter().enumerate() {
        let mut entry = String::new();
        let _ = writeln!(entry, "{}. {}", i + 1, item.title);
        let _ = writeln!(entry, "   URL: {}", item.url);
        let _ = writeln!(entry, "   Score: {:.2}", item.score);
        let _ = write!(entry, "   {}", item.content);
        sections.push(entry);
    }

    sections.join("\n\n")
}

/// Renders an extract result: content blocks, then failed and skipped URLs.
#[must_use]
pub fn render_extract(result: &ExtractResult) -> String {
    let mut sections = Vec::new();

    if result.nothing_extracted() {
        sections.push(NOTHING_EXTRACTED.to_string());
    } else {
        let blocks: Vec<String> = result
            .succeeded
            .iter()
            .map(|page| format!("## {}\n\n{}", page.url, page.raw_content))
            .collect();
        sections.push(format!(
            "Extracted content from {} URL(s):\n\n{}",
            result.succeeded.len(),
            blocks.join("\n\n---\n\n")
        ));
    }

    if !result.failed.is_empty() {
        let mut failed = String::from("Failed URLs:");
        for f in &result.failed {
            let _ = write!(failed, "\n- {}: {}", f.url, f.error);
        }
        sections.push(failed);
    }

    if !result.dropped.is_empty() {
        let mut skipped = format!("Skipped URLs (batch limit of {MAX_EXTRACT_URLS} exceeded):");
        for url in &result.dropped {
            let _ = write!(skipped, "\n- {url}");
        }
        sections.push(skipped);
    }

    sections.join("\n\n")
}

/// Renders a context string under its heading.
#[must_use]
pub fn render_context(query: &str, context: &str) -> String {
    format!("Search context for: {query}\n\n{context}")
}

/// Renders a service failure as the tool's return text.
#[must_use]
pub fn render_api_error(err: &ApiError) -> String {
    format!("Tavily error: {err} (type: {})", err.kind)
}
