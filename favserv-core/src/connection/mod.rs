//! Connection orchestration
//!
//! This module provides the [`ConnectionOrchestrator`], which takes a saved
//! [`ServerRecord`](crate::models::ServerRecord), resolves its hostname,
//! hands the address to the host transport and answers the host's password
//! challenge with the saved credential.

mod orchestrator;

use std::fmt;

use thiserror::Error;

use crate::resolver::ResolveError;

pub use orchestrator::ConnectionOrchestrator;

/// Errors surfaced to the user while connecting
///
/// Every variant is non-fatal: the orchestrator shows the
/// [`user_message`](ConnectError::user_message), resets the attempt and
/// returns to [`ConnectState::Idle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// The hostname could not be resolved
    #[error("Could not resolve '{host}': {reason}")]
    UnresolvedHost {
        /// Hostname that failed
        host: String,
        /// Resolver message
        reason: String,
    },

    /// The resolver answered with no addresses
    #[error("No addresses found for '{host}'")]
    EmptyResolution {
        /// Hostname that resolved to nothing
        host: String,
    },

    /// The host is not in a state that permits starting a connection
    #[error("Cannot connect right now: not in a connectable context")]
    NotConnectable,

    /// The host transport rejected or failed the connection
    #[error("Connection failed: {0}")]
    Transport(String),
}

impl ConnectError {
    /// Short message suitable for an on-screen notification
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnresolvedHost { host, .. } => format!("Could not resolve {host}"),
            Self::EmptyResolution { host } => format!("No address found for {host}"),
            Self::NotConnectable => "Open the main menu to connect".to_string(),
            Self::Transport(reason) => format!("Connection failed: {reason}"),
        }
    }
}

impl From<ResolveError> for ConnectError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NoAddresses(host) => Self::EmptyResolution { host },
            ResolveError::LookupFailed { host, reason } => Self::UnresolvedHost { host, reason },
            ResolveError::NoRuntime(host) => Self::UnresolvedHost {
                host,
                reason: "no async runtime available".to_string(),
            },
            ResolveError::Cancelled(host) => Self::UnresolvedHost {
                host,
                reason: "lookup cancelled".to_string(),
            },
        }
    }
}

/// Result type alias for connection operations
pub type ConnectResult<T> = std::result::Result<T, ConnectError>;

/// Identifies one connection attempt
///
/// A resolution result is applied only if it carries the id of the attempt
/// currently in progress; results of superseded attempts are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(u64);

impl AttemptId {
    /// Returns the raw sequence number
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub(crate) const fn first() -> Self {
        Self(1)
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectState {
    /// No attempt in progress
    #[default]
    Idle,
    /// Waiting for the hostname lookup
    Resolving,
    /// Handed off to the transport; waiting for the handshake or completion
    AwaitingPasswordOrComplete,
}

impl fmt::Display for ConnectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Resolving => write!(f, "resolving"),
            Self::AwaitingPasswordOrComplete => write!(f, "awaiting password or completion"),
        }
    }
}

/// Outcome of [`ConnectionOrchestrator::auto_select_identity`]
///
/// Anything other than [`IdentitySelection::Selected`] leaves the host's own
/// selection screen in charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySelection {
    /// The identity was selected and confirmed
    Selected {
        /// Index in the host's profile list
        index: usize,
        /// Profile name as the host reports it
        name: String,
    },
    /// No held record, or the held record has no preferred identity
    NotRequested,
    /// The preferred identity has no save data on this machine
    UnknownIdentity(String),
    /// The host offered no profiles
    NoProfiles,
    /// None of the host's profiles matches the preferred identity
    NoMatch(String),
    /// The selection adapter failed or reported an unsupported version
    AdapterFailed(String),
}

impl IdentitySelection {
    /// Returns true if the identity was selected and confirmed
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        matches!(self, Self::Selected { .. })
    }
}
