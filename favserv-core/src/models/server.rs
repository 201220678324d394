//! Favorite server record model.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Port used when a record omits one or stores an unparsable value
pub const DEFAULT_PORT: u16 = 2456;

/// Opaque, immutable identifier of a [`ServerRecord`]
///
/// Freshly created ids are UUID v4 strings, but ids read back from the
/// favorites file are kept verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a new, never-before-used identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier string
    #[must_use]
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty (never assigned)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Validation failure for a record produced by an edit workflow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The display name is blank
    #[error("Name is required")]
    EmptyName,
    /// The hostname is blank
    #[error("Hostname is required")]
    EmptyHostname,
    /// The port is outside 1..=65535
    #[error("Invalid port number: {0}")]
    InvalidPort(u32),
    /// A value ends in `\`, which would escape the field separator on disk
    #[error("{field} must not end with a backslash")]
    TrailingBackslash {
        /// Name of the offending field
        field: &'static str,
    },
}

/// A saved favorite server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Unique identifier, preserved across updates
    pub id: RecordId,
    /// Display label
    pub name: String,
    /// Literal address or DNS name
    pub hostname: String,
    /// Game port
    pub port: u16,
    /// Saved plaintext password; empty means none
    #[serde(default)]
    pub password: String,
    /// Identity to auto-select on connect; empty means always ask
    #[serde(default)]
    pub preferred_identity: String,
    /// Whether a launcher UI should show this record as a shortcut
    #[serde(default)]
    pub show_in_launcher: bool,
    /// Accent color a launcher UI uses for this record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launcher_color: Option<String>,
}

impl ServerRecord {
    /// Creates a record with a fresh id, the default port and no password
    #[must_use]
    pub fn new(name: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            name: name.into(),
            hostname: hostname.into(),
            port: DEFAULT_PORT,
            password: String::new(),
            preferred_identity: String::new(),
            show_in_launcher: false,
            launcher_color: None,
        }
    }

    /// Sets the port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the saved password
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the preferred identity
    #[must_use]
    pub fn with_preferred_identity(mut self, identity: impl Into<String>) -> Self {
        self.preferred_identity = identity.into();
        self
    }

    /// Returns true if a password is saved for this server
    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// Returns the preferred identity, if one is set
    #[must_use]
    pub fn preferred_identity(&self) -> Option<&str> {
        if self.preferred_identity.is_empty() {
            None
        } else {
            Some(&self.preferred_identity)
        }
    }

    /// Returns true if either launcher hint differs from its default
    #[must_use]
    pub fn has_launcher_hints(&self) -> bool {
        self.show_in_launcher || self.launcher_color.is_some()
    }

    /// Address shown in lists: the port is omitted when it is the default
    #[must_use]
    pub fn display_address(&self) -> String {
        if self.port == DEFAULT_PORT {
            self.hostname.clone()
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }

    /// Checks the fields an edit workflow requires before saving
    ///
    /// # Errors
    ///
    /// Returns the first failing field: blank name, blank hostname, port 0,
    /// or a value ending in a backslash.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.hostname.trim().is_empty() {
            return Err(ValidationError::EmptyHostname);
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidPort(0));
        }
        for (field, value) in [
            ("Name", &self.name),
            ("Hostname", &self.hostname),
            ("Password", &self.password),
            ("Preferred identity", &self.preferred_identity),
        ] {
            if value.ends_with('\\') {
                return Err(ValidationError::TrailingBackslash { field });
            }
        }
        Ok(())
    }
}

/// Capitalizes the first character of an identity name for display
#[must_use]
pub fn display_identity_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = ServerRecord::new("Home", "play.example.net");
        assert!(!record.id.is_empty());
        assert_eq!(record.port, DEFAULT_PORT);
        assert!(!record.has_password());
        assert_eq!(record.preferred_identity(), None);
        assert!(!record.has_launcher_hints());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ServerRecord::new("a", "a");
        let b = ServerRecord::new("b", "b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_display_address_hides_default_port() {
        let record = ServerRecord::new("Home", "10.0.0.2");
        assert_eq!(record.display_address(), "10.0.0.2");
        let record = record.with_port(2500);
        assert_eq!(record.display_address(), "10.0.0.2:2500");
    }

    #[test]
    fn test_validate() {
        assert!(ServerRecord::new("Home", "host").validate().is_ok());
        assert_eq!(
            ServerRecord::new("  ", "host").validate(),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            ServerRecord::new("Home", "").validate(),
            Err(ValidationError::EmptyHostname)
        );
        assert_eq!(
            ServerRecord::new("Home", "host").with_port(0).validate(),
            Err(ValidationError::InvalidPort(0))
        );
    }

    #[test]
    fn test_validate_rejects_trailing_backslash() {
        assert_eq!(
            ServerRecord::new("Home", "host")
                .with_password("pass\\")
                .validate(),
            Err(ValidationError::TrailingBackslash { field: "Password" })
        );
        assert_eq!(
            ServerRecord::new("Home\\", "host").validate(),
            Err(ValidationError::TrailingBackslash { field: "Name" })
        );
        assert_eq!(
            ServerRecord::new("Home", "host")
                .with_preferred_identity("ragnar\\")
                .validate(),
            Err(ValidationError::TrailingBackslash {
                field: "Preferred identity"
            })
        );
        assert!(
            ServerRecord::new("Home", "host")
                .with_password("a\\b")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_display_identity_name() {
        assert_eq!(display_identity_name("ragnar"), "Ragnar");
        assert_eq!(display_identity_name("é"), "É");
        assert_eq!(display_identity_name(""), "");
    }
}
