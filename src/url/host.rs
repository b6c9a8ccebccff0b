use url::Url;

/// Derives the robots cache key for a URL: `scheme://host[:port]`
///
/// The port is only included when it differs from the scheme default, so
/// `https://example.com:443/a` and `https://example.com/b` share a key.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_crawl::url::host_key;
///
/// let url = Url::parse("https://Example.com/docs/index.html").unwrap();
/// assert_eq!(host_key(&url), Some("https://example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_key(&url), Some("http://127.0.0.1:8080".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

/// Location of the exclusion resource for a host key
pub fn robots_url(host_key: &str) -> String {
    format!("{}/robots.txt", host_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_key_drops_path_and_query() {
        let url = Url::parse("https://example.com/a/b.html?x=1#frag").unwrap();
        assert_eq!(host_key(&url), Some("https://example.com".to_string()));
    }

    #[test]
    fn test_host_key_keeps_scheme_apart() {
        let http = Url::parse("http://example.com/").unwrap();
        let https = Url::parse("https://example.com/").unwrap();
        assert_ne!(host_key(&http), host_key(&https));
    }

    #[test]
    fn test_host_key_default_port_elided() {
        let url = Url::parse("https://example.com:443/").unwrap();
        assert_eq!(host_key(&url), Some("https://example.com".to_string()));
    }

    #[test]
    fn test_host_key_non_default_port() {
        let url = Url::parse("https://example.com:8443/").unwrap();
        assert_eq!(host_key(&url), Some("https://example.com:8443".to_string()));
    }

    #[test]
    fn test_host_key_without_host() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert_eq!(host_key(&url), None);
    }

    #[test]
    fn test_robots_url() {
        assert_eq!(
            robots_url("https://example.com"),
            "https://example.com/robots.txt"
        );
    }
}
