//! Configuration validation
//!
//! Checks training specifications for consistency before any resource is
//! allocated.

mod error;
mod validator;

#[cfg(test)]
mod proptests;

pub use error::ValidationError;
pub use validator::validate_config;
