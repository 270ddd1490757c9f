//! Client configuration
//!
//! Configuration is organized into focused structs for separation of
//! concerns:
//!
//! - [`NetworkConfig`]: base URL, default headers, request timeout
//! - [`ResilienceConfig`]: rate limiting, caching, and retry settings
//! - [`AuthConfig`]: credential injection scheme
//! - [`ClientConfig`]: main configuration that composes the above

mod auth;
mod network;
mod resilience;

pub use auth::AuthConfig;
pub use network::NetworkConfig;
pub use resilience::ResilienceConfig;

use crate::error::{CourierError, CourierResult};
use serde::{Deserialize, Serialize};

/// Top-level configuration for an [`ApiClient`](crate::client::ApiClient)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Network settings
    #[serde(default)]
    pub network: NetworkConfig,
    /// Rate limiting, caching, and retry settings
    #[serde(default)]
    pub resilience: ResilienceConfig,
    /// Authentication settings
    #[serde(default)]
    pub auth: AuthConfig,
}

impl ClientConfig {
    /// Create a new configuration for the given base URL with defaults
    /// everywhere else
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            network: NetworkConfig::new().with_base_url(base_url),
            resilience: ResilienceConfig::default(),
            auth: AuthConfig::default(),
        }
    }

    /// Replace the network settings
    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    /// Replace the resilience settings
    pub fn with_resilience(mut self, resilience: ResilienceConfig) -> Self {
        self.resilience = resilience;
        self
    }

    /// Replace the authentication settings
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Validate the configuration
    ///
    /// Checked once at client construction so that the call path can rely
    /// on the invariants.
    pub fn validate(&self) -> CourierResult<()> {
        if self.network.base_url.is_empty() {
            return Err(CourierError::config("base_url must not be empty"));
        }
        self.resilience.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config_validates() {
        let config = ClientConfig::new("https://api.example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let config = ClientConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(CourierError::Config { .. })
        ));
    }

    #[test]
    fn test_invalid_resilience_rejected() {
        let config = ClientConfig::new("https://api.example.com").with_resilience(
            ResilienceConfig::default().with_max_calls_per_minute(0),
        );
        assert!(config.validate().is_err());

        let config = ClientConfig::new("https://api.example.com")
            .with_resilience(ResilienceConfig::default().with_base_delay(Duration::ZERO));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = ClientConfig::new("https://api.example.com")
            .with_auth(AuthConfig::bearer("tok"))
            .with_resilience(ResilienceConfig::default().with_max_retries(5));

        let text = serde_json::to_string(&config).unwrap();
        let back: ClientConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.network.base_url, "https://api.example.com");
        assert_eq!(back.resilience.max_retries, 5);
    }
}
