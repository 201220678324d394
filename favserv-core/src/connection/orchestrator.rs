//! The connection state machine.

use std::net::IpAddr;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::host::{
    ChallengeResponse, HOST_API_VERSION, Handshake, IdentitySelector, PasswordChallenge,
    Transport, TransportError, UserNotifier, check_api_version,
};
use crate::identity::CharacterLookup;
use crate::models::ServerRecord;
use crate::resolver::{
    PendingLookup, ResolveResult, ResolverAdapter, parse_literal_address, pick_preferred_address,
};
use crate::tracing::span_names;

use super::{AttemptId, ConnectError, ConnectResult, ConnectState, IdentitySelection};

/// The attempt currently in progress
#[derive(Debug)]
struct Attempt {
    id: AttemptId,
    host: String,
    port: u16,
    lookup: Option<PendingLookup>,
}

/// Drives one connection attempt at a time
///
/// The orchestrator is an owned context object: the host keeps it next to
/// its update loop and routes every callback (transport completion, password
/// challenge, identity selection) to it. It holds on to the record being
/// connected to across [`reset`](Self::reset) so a late password challenge
/// can still read the saved password; only
/// [`clear_held_record`](Self::clear_held_record) drops it.
///
/// Resolution runs on the Tokio runtime. Its result is applied on the owner's
/// loop through [`poll_resolution`](Self::poll_resolution) or
/// [`next_resolution`](Self::next_resolution).
pub struct ConnectionOrchestrator {
    transport: Box<dyn Transport>,
    notifier: Option<Box<dyn UserNotifier>>,
    resolver: ResolverAdapter,
    held_record: Option<ServerRecord>,
    attempt: Option<Attempt>,
    last_attempt: Option<AttemptId>,
}

impl std::fmt::Debug for ConnectionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionOrchestrator")
            .field("state", &self.state())
            .field("held_record", &self.held_record.as_ref().map(|r| &r.id))
            .field("attempt", &self.current_attempt())
            .finish_non_exhaustive()
    }
}

impl ConnectionOrchestrator {
    /// Creates an idle orchestrator
    #[must_use]
    pub fn new(transport: Box<dyn Transport>, resolver: ResolverAdapter) -> Self {
        Self {
            transport,
            notifier: None,
            resolver,
            held_record: None,
            attempt: None,
            last_attempt: None,
        }
    }

    /// Sets the collaborator used to show errors to the user
    ///
    /// Without one, errors are only logged.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Box<dyn UserNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Current state, derived from the attempt in progress
    #[must_use]
    pub fn state(&self) -> ConnectState {
        match &self.attempt {
            None => ConnectState::Idle,
            Some(attempt) if attempt.lookup.is_some() => ConnectState::Resolving,
            Some(_) => ConnectState::AwaitingPasswordOrComplete,
        }
    }

    /// Returns true while an attempt is in progress
    #[must_use]
    pub const fn is_connecting(&self) -> bool {
        self.attempt.is_some()
    }

    /// Id of the attempt in progress
    #[must_use]
    pub fn current_attempt(&self) -> Option<AttemptId> {
        self.attempt.as_ref().map(|a| a.id)
    }

    /// The record of the current or most recent attempt, if still held
    #[must_use]
    pub const fn held_record(&self) -> Option<&ServerRecord> {
        self.held_record.as_ref()
    }

    /// Preferred identity of the held record, if it has one
    #[must_use]
    pub fn preferred_identity(&self) -> Option<&str> {
        self.held_record
            .as_ref()
            .and_then(ServerRecord::preferred_identity)
    }

    /// Starts connecting to `record`
    ///
    /// An attempt already in progress is reset first and its lookup aborted.
    /// Literal addresses go straight to the transport; anything else is
    /// resolved in the background and the state becomes
    /// [`ConnectState::Resolving`].
    ///
    /// # Errors
    ///
    /// Returns the error that was surfaced to the user if the attempt ended
    /// immediately. The orchestrator is back in [`ConnectState::Idle`] in that
    /// case.
    pub fn connect_to_server(&mut self, record: ServerRecord) -> ConnectResult<ConnectState> {
        let span = tracing::info_span!(
            span_names::CONNECTION_ESTABLISH,
            record_id = %record.id,
            host = %record.hostname,
            port = record.port,
        );
        let _guard = span.enter();

        if self.is_connecting() {
            warn!("Connection already in progress, resetting previous attempt");
            self.reset();
        }

        let id = self.last_attempt.map_or_else(AttemptId::first, AttemptId::next);
        self.last_attempt = Some(id);
        info!(attempt_id = %id, name = %record.name, "Connecting to server");

        let host = record.hostname.clone();
        let port = record.port;
        self.held_record = Some(record);
        self.attempt = Some(Attempt {
            id,
            host: host.clone(),
            port,
            lookup: None,
        });

        if let Some(address) = parse_literal_address(&host) {
            debug!(address = %address, "Hostname is a literal address, skipping resolution");
            return self.hand_off(address, port);
        }

        match self.resolver.resolve(&host) {
            Ok(lookup) => {
                if let Some(attempt) = self.attempt.as_mut() {
                    attempt.lookup = Some(lookup);
                }
                Ok(ConnectState::Resolving)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Applies a finished lookup without blocking
    ///
    /// Returns `None` if nothing is resolving or the lookup is still running.
    pub fn poll_resolution(&mut self) -> Option<ConnectResult<ConnectState>> {
        let attempt = self.attempt.as_mut()?;
        let lookup = attempt.lookup.as_mut()?;
        let result = lookup.now_or_never()?;
        attempt.lookup = None;
        let id = attempt.id;
        self.on_resolution_complete(id, result)
    }

    /// Waits for the current lookup and applies its result
    ///
    /// Returns `None` immediately if nothing is resolving.
    pub async fn next_resolution(&mut self) -> Option<ConnectResult<ConnectState>> {
        let attempt = self.attempt.as_mut()?;
        let lookup = attempt.lookup.as_mut()?;
        let result = lookup.await;
        attempt.lookup = None;
        let id = attempt.id;
        self.on_resolution_complete(id, result)
    }

    /// Applies the result of the lookup started for `attempt_id`
    ///
    /// Results for any attempt other than the one in progress are discarded
    /// and `None` is returned. Otherwise the preferred address is handed to
    /// the transport, or the failure is surfaced and the attempt reset.
    pub fn on_resolution_complete(
        &mut self,
        attempt_id: AttemptId,
        result: ResolveResult<Vec<IpAddr>>,
    ) -> Option<ConnectResult<ConnectState>> {
        let Some(attempt) = self.attempt.as_mut().filter(|a| a.id == attempt_id) else {
            debug!(attempt_id = %attempt_id, "Discarding stale resolution result");
            return None;
        };
        if let Some(lookup) = attempt.lookup.take() {
            lookup.abort();
        }
        let host = attempt.host.clone();
        let port = attempt.port;

        let outcome = match result {
            Ok(addresses) => match pick_preferred_address(&addresses) {
                Some(address) => {
                    info!(host = %host, address = %address, "Resolved hostname");
                    self.hand_off(address, port)
                }
                None => Err(self.fail(ConnectError::EmptyResolution { host })),
            },
            Err(e) => Err(self.fail(e.into())),
        };
        Some(outcome)
    }

    /// Transport callback: the connection failed or threw
    ///
    /// Surfaces the failure and resets the attempt. Ignored when idle.
    pub fn on_connect_failed(&mut self, reason: &str) -> Option<ConnectError> {
        if !self.is_connecting() {
            return None;
        }
        Some(self.fail(ConnectError::Transport(reason.to_string())))
    }

    /// Handshake callback: the server accepted the connection
    pub fn on_handshake_complete(&mut self) {
        if let Some(record) = &self.held_record {
            info!(name = %record.name, "Connected to server");
        }
        self.reset();
    }

    /// Transport callback: the connection was closed
    pub fn on_disconnected(&mut self) {
        if self.is_connecting() {
            info!("Disconnected while connecting");
        }
        self.reset();
    }

    /// Host callback: the host's connect screen went away
    pub fn on_destroyed(&mut self) {
        self.clear_held_record();
    }

    /// Ends the attempt in progress but keeps the held record
    ///
    /// A password challenge that arrives afterwards can still use the saved
    /// password. Any running lookup is aborted.
    pub fn reset(&mut self) {
        if let Some(attempt) = self.attempt.take() {
            if let Some(lookup) = attempt.lookup {
                lookup.abort();
            }
            debug!(attempt_id = %attempt.id, "Connection attempt reset, keeping held record");
        }
    }

    /// Drops the held record
    pub fn clear_held_record(&mut self) {
        if self.held_record.take().is_some() {
            debug!("Cleared held record");
        }
    }

    /// Handshake callback: the server asked for a password
    ///
    /// If a record is held, the server needs a password and the record has
    /// one saved, the host's prompt is hidden, the password is sent and the
    /// held record is cleared; the host must then skip its own password flow.
    /// In every other case, including any adapter failure, the host's normal
    /// flow proceeds and the held record is kept.
    pub fn on_password_challenge(
        &mut self,
        challenge: &PasswordChallenge,
        handshake: &mut dyn Handshake,
    ) -> ChallengeResponse {
        let span = tracing::debug_span!(
            span_names::CONNECTION_HANDSHAKE,
            needs_password = challenge.needs_password,
        );
        let _guard = span.enter();

        let Some(record) = self.held_record.as_ref() else {
            return ChallengeResponse::PROCEED;
        };
        if !challenge.needs_password || !record.has_password() {
            debug!("No saved password needed, host prompts as usual");
            return ChallengeResponse::PROCEED;
        }
        if let Err(e) = check_api_version(handshake.api_version()) {
            warn!(error = %e, "Handshake adapter unusable, falling back to password prompt");
            return ChallengeResponse::PROCEED;
        }

        let submitted = handshake
            .hide_password_prompt()
            .and_then(|()| handshake.send_credentials(&challenge.salt, &record.password));

        match submitted {
            Ok(()) => {
                info!("Submitted saved password");
                self.clear_held_record();
                ChallengeResponse::HANDLED
            }
            Err(e) => {
                error!(error = %e, "Failed to submit saved password, falling back to password prompt");
                ChallengeResponse::PROCEED
            }
        }
    }

    /// Selection callback: selects and confirms the held record's preferred
    /// identity on the host's selection screen
    pub fn auto_select_identity(
        &self,
        lookup: &CharacterLookup,
        selector: &mut dyn IdentitySelector,
    ) -> IdentitySelection {
        let Some(preferred) = self.preferred_identity() else {
            return IdentitySelection::NotRequested;
        };
        if let Err(e) = check_api_version(selector.api_version()) {
            warn!(error = %e, "Identity selector unusable");
            return IdentitySelection::AdapterFailed(e.to_string());
        }
        if !lookup.identity_exists(preferred) {
            warn!(identity = %preferred, "Saved identity not found, showing selection");
            return IdentitySelection::UnknownIdentity(preferred.to_string());
        }

        let profiles = match selector.identities() {
            Ok(profiles) => profiles,
            Err(e) => return IdentitySelection::AdapterFailed(e.to_string()),
        };
        if profiles.is_empty() {
            warn!("Host offered no profiles");
            return IdentitySelection::NoProfiles;
        }

        let wanted = preferred.to_lowercase();
        let Some((index, name)) = profiles
            .into_iter()
            .enumerate()
            .find(|(_, name)| name.to_lowercase() == wanted)
        else {
            warn!(identity = %preferred, "No profile matches saved identity");
            return IdentitySelection::NoMatch(preferred.to_string());
        };

        if let Err(e) = selector.select(index).and_then(|()| selector.confirm()) {
            warn!(error = %e, "Failed to auto-select identity");
            return IdentitySelection::AdapterFailed(e.to_string());
        }
        info!(identity = %name, index, "Auto-selected identity");
        IdentitySelection::Selected { index, name }
    }

    /// Hands a literal address to the transport
    fn hand_off(&mut self, address: IpAddr, port: u16) -> ConnectResult<ConnectState> {
        let version = self.transport.api_version();
        if version != HOST_API_VERSION {
            let err = TransportError::UnsupportedVersion { found: version };
            return Err(self.fail(ConnectError::Transport(err.to_string())));
        }
        if !self.transport.is_connectable() {
            return Err(self.fail(ConnectError::NotConnectable));
        }

        info!(address = %address, port, "Initiating connection");
        match self.transport.initiate_connect(address, port) {
            Ok(()) => Ok(ConnectState::AwaitingPasswordOrComplete),
            Err(e) => Err(self.fail(ConnectError::Transport(e.to_string()))),
        }
    }

    /// Surfaces `err` to the user, resets the attempt and hands `err` back
    fn fail(&mut self, err: ConnectError) -> ConnectError {
        error!(error = %err, "Connection attempt failed");
        let message = err.user_message();
        let shown = self
            .notifier
            .as_mut()
            .is_some_and(|notifier| notifier.show_error(&message));
        if !shown {
            warn!(message = %message, "No notifier available for connection error");
        }
        self.reset();
        err
    }
}
