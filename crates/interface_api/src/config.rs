//! API configuration

use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Base URL of the confirmation email provider
    pub email_base_url: String,
    /// API key for the confirmation email provider
    pub email_api_key: String,
    /// Sender address for confirmation emails
    pub email_from_address: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/recadastro".to_string(),
            log_level: "info".to_string(),
            email_base_url: "https://api.resend.com".to_string(),
            email_api_key: String::new(),
            email_from_address: "Clube <recadastro@clube.example>".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_addr_joins_host_and_port() {
        let config = ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_default_email_provider_is_resend() {
        let config = ApiConfig::default();
        assert_eq!(config.email_base_url, "https://api.resend.com");
        assert!(config.email_api_key.is_empty());
    }
}
