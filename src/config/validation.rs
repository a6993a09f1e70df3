use crate::config::types::{Config, CrawlerConfig, RequestConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_request_config(&config.request)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.offset_param.is_empty() {
        return Err(ConfigError::Validation(
            "offset-param cannot be empty".to_string(),
        ));
    }

    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page-size must be >= 1, got {}",
            config.page_size
        )));
    }

    if config.offsets.is_empty() && config.page_count < 1 {
        return Err(ConfigError::Validation(format!(
            "page-count must be >= 1 when no explicit offsets are given, got {}",
            config.page_count
        )));
    }

    if config.offsets.is_empty()
        && (config.page_count - 1)
            .checked_mul(config.page_size)
            .is_none()
    {
        return Err(ConfigError::Validation(format!(
            "page-size {} x page-count {} overflows the largest offset",
            config.page_size, config.page_count
        )));
    }

    Ok(())
}

/// Validates request header configuration
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    for name in config.headers.keys() {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "request header names cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.max_open_connections < 1 || config.max_open_connections > 100 {
        return Err(ConfigError::Validation(format!(
            "max-open-connections must be between 1 and 100, got {}",
            config.max_open_connections
        )));
    }

    if config.max_idle_connections > config.max_open_connections {
        return Err(ConfigError::Validation(format!(
            "max-idle-connections ({}) cannot exceed max-open-connections ({})",
            config.max_idle_connections, config.max_open_connections
        )));
    }

    Ok(())
}
