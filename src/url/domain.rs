use url::Url;

/// Extracts the network location (`host[:port]`) from a URL
///
/// The host is lowercased. An explicit non-default port is kept, because two
/// servers on the same host but different ports are different sites. Returns
/// `None` when the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kete::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://www.workandincome.govt.nz/map/").unwrap();
        assert_eq!(
            extract_domain(&url),
            Some("www.workandincome.govt.nz".to_string())
        );
    }

    #[test]
    fn test_explicit_port_kept() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com:8080".to_string()));
    }

    #[test]
    fn test_default_port_dropped() {
        let url = Url::parse("https://example.com:443/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_no_host() {
        let url = Url::parse("data:text/plain,hello").unwrap();
        assert_eq!(extract_domain(&url), None);
    }
}
