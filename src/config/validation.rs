use crate::config::types::{Config, CrawlJobConfig, OutputConfig, RenderConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    if config.crawl.render_enabled {
        validate_render_config(&config.render)?;
    }
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the bounds of a crawl job
pub fn validate_crawl_config(config: &CrawlJobConfig) -> Result<(), ConfigError> {
    if config.max_urls < 1 || config.max_urls > 10_000 {
        return Err(ConfigError::Validation(format!(
            "max_urls must be between 1 and 10000, got {}",
            config.max_urls
        )));
    }

    if config.max_depth > 10 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be at most 10, got {}",
            config.max_depth
        )));
    }

    if config.max_concurrent < 1 || config.max_concurrent > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent must be between 1 and 100, got {}",
            config.max_concurrent
        )));
    }

    if config.request_delay_ms > 10_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be <= 10000ms, got {}ms",
            config.request_delay_ms
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in &config.custom_headers {
        if reqwest::header::HeaderName::from_bytes(name.as_bytes()).is_err()
            || reqwest::header::HeaderValue::from_str(value).is_err()
        {
            return Err(ConfigError::Validation(format!(
                "custom header '{}' is not a valid HTTP header",
                name
            )));
        }
    }

    for pattern in config
        .exclude_patterns
        .iter()
        .chain(config.include_patterns.iter())
    {
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern(
                "URL pattern cannot be empty".to_string(),
            ));
        }
    }

    if (config.mobile_analysis_enabled || config.screenshot_enabled) && !config.render_enabled {
        return Err(ConfigError::Validation(
            "mobile analysis and screenshots require render_enabled".to_string(),
        ));
    }

    Ok(())
}

fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid render endpoint: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Render endpoint '{}' must use http or https",
            config.endpoint
        )));
    }

    if config.settle_delay_ms > 30_000 {
        return Err(ConfigError::Validation(format!(
            "settle_delay_ms must be <= 30000ms, got {}ms",
            config.settle_delay_ms
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_max_urls_bounds() {
        let mut config = CrawlJobConfig::default();
        config.max_urls = 0;
        assert!(validate_crawl_config(&config).is_err());

        config.max_urls = 10_001;
        assert!(validate_crawl_config(&config).is_err());

        config.max_urls = 10_000;
        assert!(validate_crawl_config(&config).is_ok());
    }

    #[test]
    fn test_depth_zero_is_allowed() {
        let mut config = CrawlJobConfig::default();
        config.max_depth = 0;
        assert!(validate_crawl_config(&config).is_ok());

        config.max_depth = 11;
        assert!(validate_crawl_config(&config).is_err());
    }

    #[test]
    fn test_invalid_concurrency() {
        let mut config = CrawlJobConfig::default();
        config.max_concurrent = 101;
        assert!(matches!(
            validate_crawl_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let mut config = CrawlJobConfig::default();
        config.exclude_patterns = vec!["".to_string()];
        assert!(matches!(
            validate_crawl_config(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let mut config = CrawlJobConfig::default();
        config
            .custom_headers
            .insert("Bad Header".to_string(), "x".to_string());
        assert!(validate_crawl_config(&config).is_err());
    }

    #[test]
    fn test_screenshots_require_rendering() {
        let mut config = CrawlJobConfig::default();
        config.screenshot_enabled = true;
        assert!(validate_crawl_config(&config).is_err());

        config.render_enabled = true;
        assert!(validate_crawl_config(&config).is_ok());
    }

    #[test]
    fn test_render_endpoint_checked_only_when_enabled() {
        let mut config = Config::default();
        config.render.endpoint = "not a url".to_string();
        assert!(validate(&config).is_ok());

        config.crawl.render_enabled = true;
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }
}
