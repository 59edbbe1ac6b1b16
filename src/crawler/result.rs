//! Result records produced by the fetch pipeline

use serde::Serialize;

/// Fields pulled out of a fetched document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Trimmed text of the first `<title>`
    pub title: String,

    /// Trimmed text of the first `<h1>`
    pub h1: String,

    /// Every non-empty `<h1>`/`<h2>` text, in document order
    pub all_headers: Vec<String>,

    /// Trimmed `content` of `<meta name="description">`
    pub description: String,
}

/// Outcome of the full attempt sequence for one URL
///
/// A failed result never carries content: every content field is empty
/// whenever `is_active` is false. Use [`ScrapeResult::success`] and
/// [`ScrapeResult::failure`] to build one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeResult {
    /// Target URL with its scheme applied
    pub url: String,

    /// True iff a 200 response was obtained within the retry budget
    pub is_active: bool,

    /// HTTP status of the successful response
    pub status: Option<u16>,

    /// Number of request attempts made
    pub attempts: u32,

    pub page_title: String,
    pub h1: String,
    pub all_headers: Vec<String>,
    pub description: String,
}

impl ScrapeResult {
    /// Builds a successful result from an extracted page
    pub fn success(url: impl Into<String>, status: u16, attempts: u32, page: ExtractedPage) -> Self {
        Self {
            url: url.into(),
            is_active: true,
            status: Some(status),
            attempts,
            page_title: page.title,
            h1: page.h1,
            all_headers: page.all_headers,
            description: page.description,
        }
    }

    /// Builds a failed result; all content fields stay empty
    pub fn failure(url: impl Into<String>, attempts: u32) -> Self {
        Self {
            url: url.into(),
            attempts,
            ..Self::default()
        }
    }

    /// Returns true if any content field is populated
    pub fn has_content(&self) -> bool {
        !self.page_title.is_empty()
            || !self.h1.is_empty()
            || !self.all_headers.is_empty()
            || !self.description.is_empty()
    }

    /// Report entry for this result
    pub fn site_info(&self) -> SiteInfo {
        SiteInfo {
            title: self.page_title.clone(),
            h1: self.h1.clone(),
            all_headers: self.all_headers.clone(),
            description: self.description.clone(),
        }
    }
}

/// Per-URL entry of the aggregated report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteInfo {
    pub title: String,
    pub h1: String,
    #[serde(rename = "all_sub_headers")]
    pub all_headers: Vec<String>,
    pub description: String,
}
