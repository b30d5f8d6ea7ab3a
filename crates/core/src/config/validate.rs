use super::{types::Config, AuthMethod, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - api_key method has a non-empty key
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.auth.method == AuthMethod::ApiKey
        && config.auth.api_key.as_deref().is_none_or(str::is_empty)
    {
        return Err(ConfigError::ValidationError(
            "auth.api_key must be set when auth.method is api_key".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, DatabaseConfig, ServerConfig};
    use std::net::IpAddr;

    fn config(auth: AuthConfig, server: ServerConfig) -> Config {
        Config {
            auth,
            server,
            database: DatabaseConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        let cfg = config(
            AuthConfig {
                method: AuthMethod::None,
                api_key: None,
            },
            ServerConfig::default(),
        );
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let cfg = config(
            AuthConfig {
                method: AuthMethod::None,
                api_key: None,
            },
            ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
        );
        let result = validate_config(&cfg);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_api_key_method_requires_key() {
        let cfg = config(
            AuthConfig {
                method: AuthMethod::ApiKey,
                api_key: None,
            },
            ServerConfig::default(),
        );
        assert!(validate_config(&cfg).is_err());

        let cfg = config(
            AuthConfig {
                method: AuthMethod::ApiKey,
                api_key: Some("".to_string()),
            },
            ServerConfig::default(),
        );
        assert!(validate_config(&cfg).is_err());

        let cfg = config(
            AuthConfig {
                method: AuthMethod::ApiKey,
                api_key: Some("key".to_string()),
            },
            ServerConfig::default(),
        );
        assert!(validate_config(&cfg).is_ok());
    }
}
