//! Error types for `favserv`
//!
//! Component-specific errors (codec, resolver, connection, host adapter) live
//! next to the code that raises them; this module holds the configuration and
//! persistence errors plus the crate-wide [`FavservError`] aggregate.

use std::path::PathBuf;

use thiserror::Error;

use crate::connection::ConnectError;
use crate::models::ValidationError;
use crate::resolver::ResolveError;
use crate::store::CodecError;

/// Top-level error type for the crate
#[derive(Debug, Error)]
pub enum FavservError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Favorites store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Record validation error
    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    /// Record codec error
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Name resolution error
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Connection attempt error
    #[error("Connection error: {0}")]
    Connect(#[from] ConnectError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while locating, loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no configuration directory and none was supplied
    #[error("Could not determine the configuration directory")]
    NoConfigDir,

    /// Reading or writing a configuration file failed
    #[error("Failed to access '{path}': {source}")]
    Io {
        /// File that could not be accessed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`crate::config::AppSettings`]
    #[error("Failed to parse '{path}': {reason}")]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised by the favorites store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The favorites file exists but could not be read
    #[error("Failed to read favorites from '{path}': {source}")]
    Read {
        /// Favorites file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The favorites file could not be written
    #[error("Failed to write favorites to '{path}': {source}")]
    Write {
        /// Favorites file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// No record matches the given reference
    #[error("Server not found: {0}")]
    NotFound(String),

    /// A name prefix matched more than one record
    #[error("Ambiguous server name '{reference}'. Matches: {}", matches.join(", "))]
    Ambiguous {
        /// The reference that was looked up
        reference: String,
        /// Names of every matching record
        matches: Vec<String>,
    },
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
