use crate::config::types::{Config, CrawlerConfig, HtmlConfig, OutputConfig, ScopeConfig};
use crate::url::parse_prefixes;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

impl Config {
    /// Validates the configuration after all overrides have been applied
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_scope_config(&config.scope)?;
    validate_output_config(&config.output)?;
    validate_html_config(&config.html)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 64, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the start URL and scope prefixes
fn validate_scope_config(config: &ScopeConfig) -> Result<(), ConfigError> {
    if config.start.is_empty() {
        return Err(ConfigError::Validation("start URL is required".to_string()));
    }

    let start = Url::parse(&config.start)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", config.start, e)))?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Start URL '{}' must use HTTP or HTTPS",
            config.start
        )));
    }

    if start.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            config.start
        )));
    }

    for entry in &config.prefixes {
        parse_prefixes(entry).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid scope prefix '{}': {}", entry, e))
        })?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that both region selectors parse
fn validate_html_config(config: &HtmlConfig) -> Result<(), ConfigError> {
    for selector in [&config.main_selector, &config.nav_selector] {
        Selector::parse(selector)
            .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))?;
    }

    Ok(())
}
