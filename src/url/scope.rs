use crate::url::CrawlTarget;

/// Predicate deciding whether a discovered target may be enqueued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeRule {
    /// Full-site mode: any page on the start domain
    SameDomain { domain: String },

    /// Category mode: pages on the start domain under a path prefix
    PathPrefix { domain: String, prefix: String },
}

impl ScopeRule {
    /// Full-site scope for a crawl starting at `start`
    pub fn same_domain(start: &CrawlTarget) -> Self {
        Self::SameDomain {
            domain: start.domain().to_string(),
        }
    }

    /// Category scope for a crawl starting at `start`
    ///
    /// The prefix is the directory of the start page, so
    /// `/map/card-services/index.html` scopes to `/map/card-services/`.
    pub fn category(start: &CrawlTarget) -> Self {
        Self::PathPrefix {
            domain: start.domain().to_string(),
            prefix: directory_prefix(start.path()),
        }
    }

    /// Returns true if `target` is in scope
    pub fn accepts(&self, target: &CrawlTarget) -> bool {
        match self {
            Self::SameDomain { domain } => target.domain() == domain,
            Self::PathPrefix { domain, prefix } => {
                target.domain() == domain && target.path().starts_with(prefix.as_str())
            }
        }
    }
}

/// Derives the directory prefix of a URL path
///
/// A final segment that looks like a file name (contains a `.`) is dropped;
/// anything else is treated as a directory. The result always ends in `/`.
///
/// # Examples
///
/// ```
/// use kete::url::directory_prefix;
///
/// assert_eq!(directory_prefix("/map/card-services/index.html"), "/map/card-services/");
/// assert_eq!(directory_prefix("/map/card-services"), "/map/card-services/");
/// assert_eq!(directory_prefix("/"), "/");
/// ```
pub fn directory_prefix(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    let (dir, last) = match trimmed.rsplit_once('/') {
        Some((dir, last)) => (dir, last),
        None => ("", trimmed),
    };

    if path.ends_with('/') || !last.contains('.') {
        format!("{}/", trimmed)
    } else {
        format!("{}/", dir)
    }
}
