use serde::Deserialize;

/// Main configuration structure for Course-Mirror
///
/// Every key is optional in the TOML file; the start URL is normally
/// supplied on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub html: HtmlConfig,
}

impl Config {
    /// Creates a configuration with defaults for everything but the start URL
    pub fn for_start(start: impl Into<String>) -> Self {
        Self {
            scope: ScopeConfig {
                start: start.into(),
                prefixes: Vec::new(),
            },
            ..Self::default()
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,

    /// Maximum number of fetches in flight at once
    #[serde(
        rename = "max-concurrent-requests",
        default = "default_max_concurrent_requests"
    )]
    pub max_concurrent_requests: usize,

    /// Stop dispatching new fetches after this many
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,

    /// Value of the `Cookie` header sent with every request
    #[serde(default = "default_cookie")]
    pub cookie: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_concurrent_requests: default_max_concurrent_requests(),
            max_pages: None,
            cookie: default_cookie(),
        }
    }
}

/// Crawl boundary configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeConfig {
    /// First page to crawl
    #[serde(default)]
    pub start: String,

    /// Scope prefixes; each entry may itself be a comma-separated list.
    /// Empty means the whole host of the start URL.
    #[serde(default)]
    pub prefixes: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root of the mirror tree; the report is written here too
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

/// CSS selectors locating the page regions links are taken from
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    #[serde(rename = "main-selector", default = "default_main_selector")]
    pub main_selector: String,

    #[serde(rename = "nav-selector", default = "default_nav_selector")]
    pub nav_selector: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            main_selector: default_main_selector(),
            nav_selector: default_nav_selector(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent_requests() -> usize {
    4
}

fn default_cookie() -> String {
    "userlang=en".to_string()
}

fn default_output_directory() -> String {
    "course-info".to_string()
}

fn default_main_selector() -> String {
    "article.content".to_string()
}

fn default_nav_selector() -> String {
    "nav.sidebar".to_string()
}
