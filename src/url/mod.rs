//! URL handling module for Sumi-Crawl
//!
//! URLs are opaque tokens inside the crawler: nothing here normalizes case,
//! trailing slashes or query order. This module only validates seeds, derives
//! robots host keys and applies the link validity predicate.

mod filter;
mod host;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use filter::UrlFilter;
pub use host::{host_key, robots_url};

/// Checks that a seed is an absolute http(s) URL with a host
///
/// The original string is returned untouched so the frontier sees exactly
/// what the caller supplied.
///
/// # Examples
///
/// ```
/// use sumi_crawl::url::parse_seed;
///
/// assert!(parse_seed("https://example.com/").is_ok());
/// assert!(parse_seed("ftp://example.com/").is_err());
/// assert!(parse_seed("/relative").is_err());
/// ```
pub fn parse_seed(seed: &str) -> Result<String, UrlError> {
    let url = Url::parse(seed).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(seed.to_string()));
    }

    Ok(seed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_returned_verbatim() {
        // No normalization: the trailing-slash-free form survives
        assert_eq!(
            parse_seed("https://Example.com").unwrap(),
            "https://Example.com"
        );
    }

    #[test]
    fn test_seed_rejects_bad_scheme() {
        assert!(matches!(
            parse_seed("ftp://example.com/"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_seed_rejects_garbage() {
        assert!(matches!(parse_seed("no scheme"), Err(UrlError::Parse(_))));
    }
}
