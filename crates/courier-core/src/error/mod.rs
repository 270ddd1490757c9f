//! Error types for the courier client
//!
//! This module provides the crate-wide error enum, constructor helpers,
//! retry classification, and conversions from third-party error types.

mod classifiers;
mod constructors;
mod conversions;
mod types;

pub use classifiers::{ErrorClass, classify_error};
pub use types::{CourierError, CourierResult};
