//! CLI error types and exit codes.

use favserv_core::error::{FavservError, StoreError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or other non-connection errors
    pub const GENERAL_ERROR: i32 = 1;
    /// Connection failure - the server could not be found, resolved or
    /// reached
    pub const CONNECTION_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server not found
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    /// Invalid record
    #[error("Invalid server: {0}")]
    Validation(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(reference) => Self::ServerNotFound(reference),
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<FavservError> for CliError {
    fn from(err: FavservError) -> Self {
        match err {
            FavservError::Config(e) => Self::Config(e.to_string()),
            FavservError::Store(e) => e.into(),
            FavservError::Validation(e) => Self::Validation(e.to_string()),
            FavservError::Codec(e) => Self::Config(e.to_string()),
            FavservError::Resolve(e) => Self::Connection(e.to_string()),
            FavservError::Connect(e) => Self::Connection(e.to_string()),
            FavservError::Io(e) => Self::Io(e),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, validation, IO)
    /// - 2: Connection failure (server not found, resolution or transport)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ServerNotFound(_) | Self::Connection(_) => exit_codes::CONNECTION_FAILURE,
            Self::Config(_) | Self::Validation(_) | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
