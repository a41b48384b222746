use crate::url::domain::extract_domain;
use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// A URL eligible for crawling
///
/// Construction enforces the two invariants every frontier and scope check
/// relies on: the scheme is `http` or `https`, and the fragment is gone.
/// Two URLs that differ only by fragment therefore produce equal targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTarget {
    url: Url,
    domain: String,
}

impl CrawlTarget {
    /// Parses and normalizes a URL string into a target
    ///
    /// # Examples
    ///
    /// ```
    /// use kete::url::CrawlTarget;
    ///
    /// let a = CrawlTarget::parse("https://example.com/page#one").unwrap();
    /// let b = CrawlTarget::parse("https://example.com/page#two").unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str(), "https://example.com/page");
    /// ```
    pub fn parse(url_str: &str) -> UrlResult<Self> {
        let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(url)
    }

    /// Builds a target from an already parsed URL
    pub fn from_url(mut url: Url) -> UrlResult<Self> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        url.set_fragment(None);

        let domain = extract_domain(&url).ok_or(UrlError::MissingDomain)?;

        Ok(Self { url, domain })
    }

    /// The fragment-free URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL as a string; also the membership key in the frontier
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Lowercase `host[:port]`
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The percent-encoded path component (always starts with `/`)
    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// Copy of this target with the query string removed
    pub fn without_query(&self) -> Self {
        let mut url = self.url.clone();
        url.set_query(None);
        Self {
            url,
            domain: self.domain.clone(),
        }
    }

    /// True when the path ends in `.pdf`, ignoring case
    pub fn has_pdf_suffix(&self) -> bool {
        self.path().to_ascii_lowercase().ends_with(".pdf")
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_removed() {
        let target = CrawlTarget::parse("https://example.com/page#section").unwrap();
        assert_eq!(target.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_fragment_variants_are_equal() {
        let a = CrawlTarget::parse("https://x.org/y#section1").unwrap();
        let b = CrawlTarget::parse("https://x.org/y#section2").unwrap();
        let c = CrawlTarget::parse("https://x.org/y").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_query_is_kept() {
        let target = CrawlTarget::parse("https://example.com/page?b=2&a=1#top").unwrap();
        assert_eq!(target.as_str(), "https://example.com/page?b=2&a=1");
    }

    #[test]
    fn test_http_allowed() {
        let target = CrawlTarget::parse("http://example.com/").unwrap();
        assert_eq!(target.url().scheme(), "http");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = CrawlTarget::parse("ftp://example.com/file");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));

        let result = CrawlTarget::parse("mailto:someone@example.com");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_malformed_url() {
        assert!(matches!(
            CrawlTarget::parse("not a url"),
            Err(UrlError::Parse(_))
        ));
    }

    #[test]
    fn test_domain_and_path() {
        let target = CrawlTarget::parse("https://WWW.Example.COM:8443/Map/Index.html").unwrap();
        assert_eq!(target.domain(), "www.example.com:8443");
        assert_eq!(target.path(), "/Map/Index.html");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let target = CrawlTarget::parse("https://example.com").unwrap();
        assert_eq!(target.path(), "/");
    }

    #[test]
    fn test_pdf_suffix() {
        assert!(CrawlTarget::parse("https://e.com/forms/A.PDF")
            .unwrap()
            .has_pdf_suffix());
        assert!(!CrawlTarget::parse("https://e.com/forms/a.pdf.html")
            .unwrap()
            .has_pdf_suffix());
    }
}
