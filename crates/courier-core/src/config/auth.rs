//! Authentication configuration
//!
//! Covers credential injection only: the client attaches credentials to
//! outgoing requests but never acquires or refreshes tokens itself.

use serde::{Deserialize, Serialize};

/// Authentication scheme applied to every outgoing request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,
    /// HTTP Basic authentication
    Basic { username: String, password: String },
    /// Bearer token in the Authorization header
    Bearer { token: String },
    /// API key sent as a named header
    ApiKeyHeader { header: String, key: String },
    /// API key sent as a query parameter
    ApiKeyQuery { param: String, key: String },
}

impl AuthConfig {
    /// HTTP Basic authentication
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer token authentication
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// API key sent as a named header (e.g. `X-API-Key`)
    pub fn api_key_header(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ApiKeyHeader {
            header: header.into(),
            key: key.into(),
        }
    }

    /// API key sent as a query parameter (e.g. `api_key`)
    pub fn api_key_query(param: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ApiKeyQuery {
            param: param.into(),
            key: key.into(),
        }
    }

    /// Check whether any credentials are configured
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }
}
