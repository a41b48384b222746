use serde::Deserialize;

/// Default entry page of the MAP manual
pub const DEFAULT_START_URL: &str = "https://www.workandincome.govt.nz/map/index.html";

/// Main configuration structure for Kete
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Where the archive lives and where crawling starts
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Root directory holding `html/`, `pdfs/`, `pdf_text/` and the timestamp files
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,

    /// Start URL for the full-site crawl; also the navigation page for category crawls
    #[serde(rename = "start-url", default = "default_start_url")]
    pub start_url: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            start_url: default_start_url(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Delay applied after every fetch (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Age in days after which the archive is considered stale
    #[serde(rename = "max-age-days", default = "default_max_age_days")]
    pub max_age_days: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            max_age_days: default_max_age_days(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default = "default_contact_url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default = "default_contact_email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: default_contact_url(),
            contact_email: default_contact_email(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

fn default_output_dir() -> String {
    "data".to_string()
}

fn default_start_url() -> String {
    DEFAULT_START_URL.to_string()
}

fn default_request_delay_ms() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_age_days() -> u64 {
    30
}

fn default_crawler_name() -> String {
    "Kete".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact_url() -> String {
    "https://example.com/kete".to_string()
}

fn default_contact_email() -> String {
    "archive@example.com".to_string()
}
