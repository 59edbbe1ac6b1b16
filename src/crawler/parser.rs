//! Document extraction for fetched pages
//!
//! This module pulls the headline fields out of an HTML body:
//! - Page title
//! - First `<h1>`
//! - Every `<h1>`/`<h2>` in document order
//! - Meta description
//!
//! Extraction is lenient: malformed or empty documents yield empty fields,
//! never an error.

use crate::crawler::result::ExtractedPage;
use scraper::{ElementRef, Html, Selector};

/// Capability that derives structured fields from a fetched body
///
/// Implementations must be pure functions of their input so the fetcher can
/// call them from any worker.
pub trait DocumentExtractor: Send + Sync {
    /// Extracts the headline fields from a document body
    fn extract(&self, body: &str) -> ExtractedPage;
}

/// Default extractor backed by the `scraper` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl DocumentExtractor for HtmlExtractor {
    fn extract(&self, body: &str) -> ExtractedPage {
        parse_html(body)
    }
}

/// Parses HTML content and extracts the headline fields
///
/// # Example
///
/// ```
/// use webpulse::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><h1>Hello</h1></body></html>"#;
/// let page = parse_html(html);
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.h1, "Hello");
/// ```
pub fn parse_html(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        title: first_text(&document, "title"),
        h1: first_text(&document, "h1"),
        all_headers: extract_headers(&document),
        description: extract_description(&document),
    }
}

/// Trimmed text of an element, including its descendants
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first element matching `selector`, or empty
fn first_text(document: &Html, selector: &str) -> String {
    Selector::parse(selector)
        .ok()
        .and_then(|selector| document.select(&selector).next().map(element_text))
        .unwrap_or_default()
}

/// Collects every non-empty h1/h2 text in document order
fn extract_headers(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("h1, h2") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Extracts the meta description content
fn extract_description(document: &Html) -> String {
    let Ok(selector) = Selector::parse(r#"meta[name="description"]"#) else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}
