//! `favserv` Core Library
//!
//! This crate keeps a list of favorite game servers and connects to one with a
//! single call, resolving its hostname and answering the server's password
//! challenge with the saved credential.
//!
//! # Crate Structure
//!
//! - [`models`] - The [`ServerRecord`] and its identifier
//! - [`store`] - Pipe-delimited favorites file and the [`FavoritesStore`]
//! - [`resolver`] - Background hostname resolution with IPv4 preference
//! - [`connection`] - The [`ConnectionOrchestrator`] state machine
//! - [`host`] - Versioned traits the host application implements
//! - [`identity`] - Scan of identity save files for auto-selection
//! - [`config`] - Config directory and `settings.toml`
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod connection;
pub mod error;
pub mod host;
pub mod identity;
pub mod models;
pub mod resolver;
pub mod store;
pub mod tracing;

pub use config::{AppSettings, ConfigManager};
pub use connection::{
    AttemptId, ConnectError, ConnectResult, ConnectState, ConnectionOrchestrator,
    IdentitySelection,
};
pub use error::{ConfigError, ConfigResult, FavservError, StoreError, StoreResult};
pub use host::{
    AdapterError, ChallengeResponse, ChallengeSalt, HOST_API_VERSION, Handshake,
    IdentitySelector, PasswordChallenge, Transport, TransportError, UserNotifier,
};
pub use identity::CharacterLookup;
pub use models::{DEFAULT_PORT, RecordId, ServerRecord, ValidationError};
pub use resolver::{ResolveError, Resolver, ResolverAdapter, SystemResolver};
pub use store::{ChangeKind, FavoritesStore, LoadReport, StoreChange};
pub use crate::tracing::{TracingConfig, TracingError, TracingLevel, TracingOutput, init_tracing};
