//! Error types for the Meridian core library
//!
//! Absence of data is never an error here: compilers return `None` for
//! operations they do not handle and the path finders return `Ok(None)` when
//! no path exists. Errors are reserved for requests the engine refuses,
//! inverses that do not exist, malformed registry data and explicit gaps.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use meridian_transform::TransformError;
use thiserror::Error;

use crate::model::{CrsCode, CrsKind};

/// Main error type for Meridian operations
#[derive(Error, Debug)]
pub enum Error {
    /// A path was requested to or from a CRS kind the engine cannot route
    #[error("Unsupported CRS kind: {crs} is {kind}")]
    UnsupportedKind { crs: CrsCode, kind: CrsKind },

    /// A path was requested from a CRS to itself
    #[error("Source and target are the same CRS: {crs}")]
    IdenticalCrs { crs: CrsCode },

    /// A CRS code did not resolve in the registry
    #[error("Unknown CRS: {code}")]
    UnknownCrs { code: CrsCode },

    /// The inverse of a one-way operation was requested
    #[error("No inverse available for operation '{operation}'")]
    NoInverse { operation: String },

    /// A projected CRS base chain loops back on itself
    #[error("Cyclic base CRS chain at {crs}: {chain:?}")]
    CyclicBaseChain { crs: CrsCode, chain: Vec<CrsCode> },

    /// A recognised situation the engine explicitly does not handle
    #[error("Not implemented: {message}")]
    NotImplemented {
        message: String,
        feature: Option<String>,
    },

    /// Registry loading or validation errors
    #[error("Registry error: {message}")]
    Registry {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Errors raised while evaluating or inverting a transform
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Result type alias for Meridian operations
pub type Result<T> = std::result::Result<T, Error>;

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Registry {
            message: err.to_string(),
            source: Some(err),
        }
    }
}
