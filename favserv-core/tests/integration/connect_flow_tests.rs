//! End-to-end connection flow: stored record to transport hand-off to
//! password injection

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use favserv_core::resolver::ResolveResult;
use favserv_core::{
    AdapterError, ChallengeResponse, ChallengeSalt, CharacterLookup, ConfigManager, ConnectError,
    ConnectState, ConnectionOrchestrator, Handshake, IdentitySelection, IdentitySelector,
    PasswordChallenge, Resolver, ResolverAdapter, ServerRecord, Transport, TransportError,
};
use tempfile::TempDir;

type Endpoints = Arc<Mutex<Vec<(IpAddr, u16)>>>;

struct MenuTransport {
    at_menu: bool,
    endpoints: Endpoints,
}

impl Transport for MenuTransport {
    fn is_connectable(&self) -> bool {
        self.at_menu
    }

    fn initiate_connect(&mut self, address: IpAddr, port: u16) -> Result<(), TransportError> {
        self.endpoints.lock().unwrap().push((address, port));
        Ok(())
    }
}

struct CountingResolver {
    answer: Vec<IpAddr>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Resolver for CountingResolver {
    async fn resolve(&self, _hostname: &str) -> ResolveResult<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

#[derive(Default)]
struct ScriptedHandshake {
    sent: Vec<(String, String)>,
}

impl Handshake for ScriptedHandshake {
    fn hide_password_prompt(&mut self) -> Result<(), AdapterError> {
        Ok(())
    }

    fn send_credentials(&mut self, salt: &ChallengeSalt, password: &str) -> Result<(), AdapterError> {
        self.sent.push((salt.as_str().to_string(), password.to_string()));
        Ok(())
    }
}

struct ProfileScreen {
    profiles: Vec<String>,
    chosen: Option<usize>,
}

impl IdentitySelector for ProfileScreen {
    fn identities(&self) -> Result<Vec<String>, AdapterError> {
        Ok(self.profiles.clone())
    }

    fn select(&mut self, index: usize) -> Result<(), AdapterError> {
        self.chosen = Some(index);
        Ok(())
    }

    fn confirm(&mut self) -> Result<(), AdapterError> {
        Ok(())
    }
}

const V4: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 44));
const V6: IpAddr = IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 44));

fn orchestrator(
    at_menu: bool,
    answer: Vec<IpAddr>,
) -> (ConnectionOrchestrator, Endpoints, Arc<AtomicUsize>) {
    let endpoints = Endpoints::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = CountingResolver {
        answer,
        calls: Arc::clone(&calls),
    };
    let orchestrator = ConnectionOrchestrator::new(
        Box::new(MenuTransport {
            at_menu,
            endpoints: Arc::clone(&endpoints),
        }),
        ResolverAdapter::new(Arc::new(resolver)),
    );
    (orchestrator, endpoints, calls)
}

#[tokio::test]
async fn test_stored_record_connects_and_injects_password() {
    let dir = TempDir::new().unwrap();
    let config = ConfigManager::with_config_dir(dir.path().to_path_buf());
    let settings = config.load_settings().unwrap();

    let mut store = config.open_favorites(&settings);
    let id = store.add(
        ServerRecord::new("Clan", "clan.example.net")
            .with_port(2460)
            .with_password("open sesame"),
    );

    // Reload as a fresh process would.
    let store = config.open_favorites(&settings);
    let record = store.get(&id).unwrap().clone();

    let (mut orchestrator, endpoints, calls) = orchestrator(true, vec![V6, V4]);
    assert_eq!(
        orchestrator.connect_to_server(record).unwrap(),
        ConnectState::Resolving
    );
    assert_eq!(
        orchestrator.next_resolution().await,
        Some(Ok(ConnectState::AwaitingPasswordOrComplete))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(*endpoints.lock().unwrap(), vec![(V4, 2460)]);

    let mut handshake = ScriptedHandshake::default();
    let response = orchestrator
        .on_password_challenge(&PasswordChallenge::new(true, "salt-1"), &mut handshake);
    assert_eq!(response, ChallengeResponse::HANDLED);
    assert_eq!(
        handshake.sent,
        vec![("salt-1".to_string(), "open sesame".to_string())]
    );
    assert!(orchestrator.held_record().is_none());

    orchestrator.on_handshake_complete();
    assert_eq!(orchestrator.state(), ConnectState::Idle);
}

#[test]
fn test_literal_record_never_resolves() {
    let (mut orchestrator, endpoints, calls) = orchestrator(true, vec![V4]);
    orchestrator
        .connect_to_server(ServerRecord::new("Lan", "203.0.113.5"))
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let endpoints = endpoints.lock().unwrap();
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].0.to_string(), "203.0.113.5");
    assert_eq!(endpoints[0].1, 2456);
}

#[test]
fn test_outside_menu_is_not_connectable() {
    let (mut orchestrator, endpoints, _) = orchestrator(false, vec![V4]);
    let err = orchestrator
        .connect_to_server(ServerRecord::new("Lan", "203.0.113.5"))
        .unwrap_err();
    assert_eq!(err, ConnectError::NotConnectable);
    assert!(endpoints.lock().unwrap().is_empty());
    assert_eq!(orchestrator.state(), ConnectState::Idle);
}

#[test]
fn test_back_out_then_late_handshake() {
    let (mut orchestrator, _, _) = orchestrator(true, vec![V4]);
    orchestrator
        .connect_to_server(ServerRecord::new("Lan", "203.0.113.5").with_password("pw"))
        .unwrap();

    // User backs out to the start menu, then the handshake arrives anyway.
    orchestrator.reset();
    let mut handshake = ScriptedHandshake::default();
    let response = orchestrator
        .on_password_challenge(&PasswordChallenge::new(true, "late"), &mut handshake);
    assert_eq!(response, ChallengeResponse::HANDLED);
    assert_eq!(handshake.sent.len(), 1);

    // Once consumed, a second challenge falls back to the host prompt.
    let response = orchestrator
        .on_password_challenge(&PasswordChallenge::new(true, "again"), &mut handshake);
    assert_eq!(response, ChallengeResponse::PROCEED);
}

#[test]
fn test_preferred_identity_auto_selected() {
    let saves = TempDir::new().unwrap();
    std::fs::write(saves.path().join("astrid.fch"), b"").unwrap();
    let lookup = CharacterLookup::new(saves.path());

    let (mut orchestrator, _, _) = orchestrator(true, vec![V4]);
    orchestrator
        .connect_to_server(
            ServerRecord::new("Lan", "203.0.113.5").with_preferred_identity("Astrid"),
        )
        .unwrap();

    let mut screen = ProfileScreen {
        profiles: vec!["Bjorn".to_string(), "ASTRID".to_string()],
        chosen: None,
    };
    let outcome = orchestrator.auto_select_identity(&lookup, &mut screen);
    assert!(outcome.is_selected());
    assert_eq!(
        outcome,
        IdentitySelection::Selected {
            index: 1,
            name: "ASTRID".to_string()
        }
    );
    assert_eq!(screen.chosen, Some(1));
}
