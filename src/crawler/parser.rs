//! HTML link extraction
//!
//! The crawler only needs one thing from a page: the absolute URLs it links
//! to. Scheme and suffix filtering happens later, in the worker, so this
//! module returns every resolvable `href` (including `ftp:` and friends).

use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Unusable content; the worker treats it as "no links"
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("page body is binary, not text")]
    Encoding,

    #[error("invalid base URL {0}")]
    BaseUrl(String),
}

/// Pure link extractor: no I/O, same input gives the same output
pub trait LinkParser: Send + Sync {
    /// Extracts absolute URLs from a page body
    ///
    /// # Arguments
    ///
    /// * `base_url` - URL the body was fetched from, used to resolve relative links
    /// * `body` - Raw page bytes
    fn parse(&self, base_url: &str, body: &[u8]) -> Result<Vec<String>, ParseError>;
}

/// `scraper`-based extractor for `<a href>` links
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkParser;

impl LinkParser for HtmlLinkParser {
    fn parse(&self, base_url: &str, body: &[u8]) -> Result<Vec<String>, ParseError> {
        // NUL never appears in a text document, whatever its charset
        if body.contains(&0) {
            return Err(ParseError::Encoding);
        }
        let base = Url::parse(base_url).map_err(|_| ParseError::BaseUrl(base_url.to_string()))?;
        // Link markup is ASCII, so a lossy decode keeps every href intact in
        // Latin-1 and other legacy charsets
        let html = String::from_utf8_lossy(body);
        Ok(extract_links(&html, &base))
    }
}

/// Extracts all links from an HTML document, in document order
///
/// # Example
///
/// ```
/// use sumi_crawl::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page.html">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(extract_links(html, &base_url), vec!["https://example.com/page.html"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None for empty hrefs, same-page fragments, `javascript:` pseudo
/// links and anything the URL parser cannot join.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    base_url.join(href).ok().map(|url| url.to_string())
}
