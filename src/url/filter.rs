use crate::config::FilterConfig;
use url::Url;

/// Validity predicate applied to every discovered link before it is offered
/// to the frontier
///
/// A link is crawlable when its scheme is `http` or `https` and its path
/// either ends with one of the configured document suffixes or, if enabled,
/// ends with `/` (a directory-style path).
#[derive(Debug, Clone)]
pub struct UrlFilter {
    suffixes: Vec<String>,
    allow_directory_paths: bool,
}

impl UrlFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            suffixes: config
                .valid_suffixes
                .iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
            allow_directory_paths: config.allow_directory_paths,
        }
    }

    /// Returns true if the URL may be offered to the frontier
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_crawl::config::FilterConfig;
    /// use sumi_crawl::url::UrlFilter;
    ///
    /// let filter = UrlFilter::new(&FilterConfig::default());
    /// assert!(filter.is_valid("https://example.com/docs/"));
    /// assert!(filter.is_valid("https://example.com/page.html"));
    /// assert!(!filter.is_valid("https://example.com/image.png"));
    /// assert!(!filter.is_valid("ftp://example.com/"));
    /// ```
    pub fn is_valid(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return false;
        }

        if parsed.host_str().is_none() {
            return false;
        }

        let path = parsed.path();
        if self.allow_directory_paths && path.ends_with('/') {
            return true;
        }

        let lowered = path.to_ascii_lowercase();
        self.suffixes.iter().any(|suffix| lowered.ends_with(suffix))
    }
}

impl Default for UrlFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> UrlFilter {
        UrlFilter::default()
    }

    #[test]
    fn test_accepts_html_document() {
        assert!(filter().is_valid("https://example.com/a/b.html"));
        assert!(filter().is_valid("http://example.com/index.html"));
    }

    #[test]
    fn test_accepts_directory_path() {
        assert!(filter().is_valid("https://example.com/"));
        assert!(filter().is_valid("https://example.com/blog/"));
    }

    #[test]
    fn test_bare_host_is_root_directory() {
        // The URL parser gives a bare host the path "/"
        assert!(filter().is_valid("https://example.com"));
    }

    #[test]
    fn test_rejects_ftp_scheme() {
        assert!(!filter().is_valid("ftp://example.com/"));
        assert!(!filter().is_valid("ftp://example.com/file.html"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(!filter().is_valid("mailto:someone@example.com"));
        assert!(!filter().is_valid("javascript:void(0)"));
        assert!(!filter().is_valid("file:///etc/index.html"));
    }

    #[test]
    fn test_rejects_unlisted_suffix() {
        assert!(!filter().is_valid("https://example.com/image.png"));
        assert!(!filter().is_valid("https://example.com/about"));
    }

    #[test]
    fn test_query_does_not_affect_suffix() {
        assert!(filter().is_valid("https://example.com/page.html?ref=1"));
        assert!(!filter().is_valid("https://example.com/search?q=x.html"));
    }

    #[test]
    fn test_suffix_match_ignores_case() {
        assert!(filter().is_valid("https://example.com/PAGE.HTML"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!filter().is_valid("not a url"));
        assert!(!filter().is_valid(""));
    }

    #[test]
    fn test_custom_suffixes_without_directories() {
        let filter = UrlFilter::new(&FilterConfig {
            valid_suffixes: vec![".htm".to_string(), ".php".to_string()],
            allow_directory_paths: false,
        });
        assert!(filter.is_valid("https://example.com/index.php"));
        assert!(filter.is_valid("https://example.com/old.htm"));
        assert!(!filter.is_valid("https://example.com/docs/"));
        assert!(!filter.is_valid("https://example.com/page.html"));
    }
}
