use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a parsed configuration
///
/// Checks the semantic constraints that TOML parsing alone cannot enforce:
/// sane timeouts, a usable database path, and well-formed URLs for the
/// lookup endpoint and any category overrides.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "crawler.request-timeout-secs must be greater than 0".to_string(),
        ));
    }

    if config.output.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.database-path must not be empty".to_string(),
        ));
    }

    if Url::parse(&config.lookup.base_url).is_err() {
        return Err(ConfigError::InvalidUrl(config.lookup.base_url.clone()));
    }

    for entry in &config.categories {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category.name must not be empty".to_string(),
            ));
        }
        if Url::parse(&entry.url).is_err() {
            return Err(ConfigError::InvalidUrl(entry.url.clone()));
        }
    }

    Ok(())
}
