//! Error handling for propcalc
//!
//! The calculation engine is total and never fails. Errors only come from the
//! layers around it: editing the property collection, parsing user input and
//! loading configuration. Those share a unified Result type using anyhow for
//! context chaining and error propagation.

use thiserror::Error;

use crate::portfolio::PropertyId;

/// Errors raised by the session, configuration and input layers
#[derive(Error, Debug)]
pub enum PropcalcError {
    #[error("property #{0} not found")]
    PropertyNotFound(PropertyId),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for session and CLI operations
pub type Result<T> = anyhow::Result<T>;
