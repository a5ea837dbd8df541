use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Lookup timeout and cache TTL are positive
/// - Site hosts, endpoints and route segments are set
/// - The source origin lives on the source host
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Lookup validation
    if config.lookup.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "lookup.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.lookup.cache_ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "lookup.cache_ttl_secs cannot be 0".to_string(),
        ));
    }

    // Site validation
    let site = &config.site;
    let required = [
        ("site.source_host", &site.source_host),
        ("site.target_host", &site.target_host),
        ("site.source_origin", &site.source_origin),
        ("site.movie_segment", &site.movie_segment),
        ("site.html_search_url", &site.html_search_url),
        ("site.api_search_url", &site.api_search_url),
        ("site.direct_search_url", &site.direct_search_url),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                name
            )));
        }
    }
    if site.series_segments.is_empty() || site.series_segments.iter().any(|s| s.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "site.series_segments must list non-empty segments".to_string(),
        ));
    }
    // Detail links are built on the origin and rewritten by host.
    if !site.source_origin.contains(&site.source_host) {
        return Err(ConfigError::ValidationError(format!(
            "site.source_origin '{}' must contain site.source_host '{}'",
            site.source_origin, site.source_host
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, SiteConfig};
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_timeout_and_ttl_fail() {
        let mut config = Config::default();
        config.lookup.timeout_secs = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.lookup.cache_ttl_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_site_fields_fail() {
        let config = Config {
            site: SiteConfig {
                target_host: "  ".to_string(),
                ..SiteConfig::default()
            },
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("site.target_host"));

        let config = Config {
            site: SiteConfig {
                series_segments: vec![],
                ..SiteConfig::default()
            },
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_origin_without_source_host_fails() {
        let config = Config {
            site: SiteConfig {
                source_origin: "https://kp.example".to_string(),
                ..SiteConfig::default()
            },
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("site.source_origin"));
    }
}
