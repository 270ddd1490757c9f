//! From trait implementations for CourierError conversions

use super::types::CourierError;

impl From<reqwest::Error> for CourierError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else {
            Self::transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for CourierError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}
