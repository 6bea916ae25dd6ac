//! Configuration validation
//!
//! Validates engine configuration for correctness before an engine is built.

mod error;
mod validator;

#[cfg(test)]
mod proptests;

pub use error::ValidationError;
pub use validator::validate_config;
