//! Host adapter interface
//!
//! The connection orchestrator never reaches into the host application
//! directly. Everything it needs from the host (starting a connection,
//! showing a message, answering a password challenge, picking an identity)
//! goes through the narrow traits in this module. Every trait reports the
//! [`HOST_API_VERSION`] it was written against; the orchestrator refuses to
//! drive an adapter that reports a different version and lets the host's own
//! flow proceed instead.

use std::net::IpAddr;

use thiserror::Error;

/// Version of the host adapter interface implemented by this crate
pub const HOST_API_VERSION: u32 = 1;

/// Error reported by the host transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connect call was rejected or failed
    #[error("{0}")]
    Failed(String),

    /// The adapter implements another interface version
    #[error("Unsupported host API version {found} (expected {})", HOST_API_VERSION)]
    UnsupportedVersion {
        /// Version the adapter reported
        found: u32,
    },
}

/// Error reported by the handshake or identity-selection adapters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The host cannot perform the operation right now
    #[error("Host operation unavailable: {0}")]
    Unavailable(String),

    /// The host attempted the operation and it failed
    #[error("Host operation failed: {0}")]
    Failed(String),

    /// The adapter implements another interface version
    #[error("Unsupported host API version {found} (expected {})", HOST_API_VERSION)]
    UnsupportedVersion {
        /// Version the adapter reported
        found: u32,
    },
}

/// Checks an adapter's reported version against [`HOST_API_VERSION`]
///
/// # Errors
///
/// Returns [`AdapterError::UnsupportedVersion`] on mismatch.
pub fn check_api_version(found: u32) -> Result<(), AdapterError> {
    if found == HOST_API_VERSION {
        Ok(())
    } else {
        Err(AdapterError::UnsupportedVersion { found })
    }
}

/// The host's transport / matchmaking layer
pub trait Transport {
    /// Interface version this adapter implements
    fn api_version(&self) -> u32 {
        HOST_API_VERSION
    }

    /// Returns true if the host is in a state that permits starting a
    /// connection (e.g. its main menu is showing)
    fn is_connectable(&self) -> bool;

    /// Starts connecting to a literal address
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Failed`] if the host rejects the request.
    fn initiate_connect(&mut self, address: IpAddr, port: u16) -> Result<(), TransportError>;
}

/// The host's user-visible messaging facility
pub trait UserNotifier {
    /// Shows a short error message
    ///
    /// Returns false if messaging is currently unavailable, in which case the
    /// caller logs the message instead.
    fn show_error(&mut self, message: &str) -> bool;
}

/// Opaque salt sent by the server with a password challenge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeSalt(String);

impl ChallengeSalt {
    /// Wraps the salt received from the host
    #[must_use]
    pub fn new(salt: impl Into<String>) -> Self {
        Self(salt.into())
    }

    /// The salt as received
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A password challenge raised during the authentication handshake
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChallenge {
    /// Whether the server requires a password
    pub needs_password: bool,
    /// Salt to pass back with the credentials
    pub salt: ChallengeSalt,
}

impl PasswordChallenge {
    /// Creates a challenge
    #[must_use]
    pub fn new(needs_password: bool, salt: impl Into<String>) -> Self {
        Self {
            needs_password,
            salt: ChallengeSalt::new(salt),
        }
    }
}

/// Answer to a password challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeResponse {
    /// True if the saved password was submitted and the host must skip its
    /// own password flow
    pub handled: bool,
}

impl ChallengeResponse {
    /// The saved password was submitted
    pub const HANDLED: Self = Self { handled: true };
    /// The host should run its normal password flow
    pub const PROCEED: Self = Self { handled: false };
}

/// The host's authentication handshake, as seen from a password challenge
pub trait Handshake {
    /// Interface version this adapter implements
    fn api_version(&self) -> u32 {
        HOST_API_VERSION
    }

    /// Hides the host's own password prompt / connecting dialog
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be suppressed.
    fn hide_password_prompt(&mut self) -> Result<(), AdapterError>;

    /// Sends credentials through the host's own send-credentials entry point
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials could not be sent.
    fn send_credentials(&mut self, salt: &ChallengeSalt, password: &str)
    -> Result<(), AdapterError>;
}

/// The host's identity (character) selection screen
pub trait IdentitySelector {
    /// Interface version this adapter implements
    fn api_version(&self) -> u32 {
        HOST_API_VERSION
    }

    /// Names of the identities currently offered, in display order
    ///
    /// # Errors
    ///
    /// Returns an error if the list is not available.
    fn identities(&self) -> Result<Vec<String>, AdapterError>;

    /// Selects the identity at `index`
    ///
    /// # Errors
    ///
    /// Returns an error if the selection could not be applied.
    fn select(&mut self, index: usize) -> Result<(), AdapterError>;

    /// Confirms the current selection and continues
    ///
    /// # Errors
    ///
    /// Returns an error if the host could not continue.
    fn confirm(&mut self) -> Result<(), AdapterError>;
}
