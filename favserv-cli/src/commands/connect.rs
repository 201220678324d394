//! Connect command: resolve a favorite server and launch the game against it.

use std::cell::Cell;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::rc::Rc;

use favserv_core::config::LaunchSettings;
use favserv_core::{
    ConnectError, ConnectState, ConnectionOrchestrator, ResolverAdapter, Transport, TransportError,
    UserNotifier,
};

use crate::error::CliError;
use crate::util::open_store;

/// Connect command handler
pub fn cmd_connect(config_path: Option<&Path>, name: &str, dry_run: bool) -> Result<(), CliError> {
    let (settings, store) = open_store(config_path)?;

    if store.is_empty() {
        return Err(CliError::ServerNotFound(
            "No favorite servers configured".to_string(),
        ));
    }

    let record = store.find(name)?.clone();
    let server_name = record.name.clone();

    let endpoint = resolve_endpoint(record)?;

    let launch = &settings.launch;
    let Some(command) = LaunchCommand::from_settings(launch, endpoint) else {
        println!("{endpoint}");
        return Ok(());
    };

    if dry_run {
        println!("{command}");
        return Ok(());
    }

    println!("Connecting to '{server_name}' ({endpoint})...");
    command.spawn()
}

/// Runs the orchestrator against a transport that captures the endpoint it
/// is handed
fn resolve_endpoint(record: favserv_core::ServerRecord) -> Result<SocketAddr, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Connection(format!("Failed to start async runtime: {e}")))?;

    let endpoint = Rc::new(Cell::new(None));
    let transport = CaptureTransport {
        endpoint: Rc::clone(&endpoint),
    };

    runtime.block_on(async {
        let mut orchestrator =
            ConnectionOrchestrator::new(Box::new(transport), ResolverAdapter::system())
                .with_notifier(Box::new(TerminalNotifier));

        let mut state = orchestrator.connect_to_server(record).map_err(connect_error)?;
        if state == ConnectState::Resolving {
            state = match orchestrator.next_resolution().await {
                Some(result) => result.map_err(connect_error)?,
                None => orchestrator.state(),
            };
        }
        tracing::debug!(state = %state, "Orchestration finished");
        orchestrator.on_destroyed();
        Ok::<(), CliError>(())
    })?;

    endpoint
        .get()
        .ok_or_else(|| CliError::Connection("No endpoint was selected".to_string()))
}

fn connect_error(err: ConnectError) -> CliError {
    CliError::Connection(err.to_string())
}

/// Transport that records the endpoint instead of opening a socket; the
/// game process does the actual connecting
struct CaptureTransport {
    endpoint: Rc<Cell<Option<SocketAddr>>>,
}

impl Transport for CaptureTransport {
    fn is_connectable(&self) -> bool {
        true
    }

    fn initiate_connect(&mut self, address: IpAddr, port: u16) -> Result<(), TransportError> {
        self.endpoint.set(Some(SocketAddr::new(address, port)));
        Ok(())
    }
}

/// Writes user-facing connection errors to stderr
struct TerminalNotifier;

impl UserNotifier for TerminalNotifier {
    fn show_error(&mut self, message: &str) -> bool {
        eprintln!("{message}");
        true
    }
}

/// Program and arguments to launch for a resolved endpoint
#[derive(Debug, PartialEq, Eq)]
struct LaunchCommand {
    program: String,
    args: Vec<String>,
}

impl LaunchCommand {
    /// Builds the command from settings, or `None` if no program is set
    fn from_settings(launch: &LaunchSettings, endpoint: SocketAddr) -> Option<Self> {
        let program = launch.program.as_deref().map(str::trim)?;
        if program.is_empty() {
            return None;
        }
        Some(Self {
            program: program.to_string(),
            args: launch
                .args
                .iter()
                .map(|arg| expand_placeholders(arg, endpoint))
                .collect(),
        })
    }

    // The game client outlives the CLI; it is never waited on.
    #[allow(clippy::zombie_processes)]
    fn spawn(&self) -> Result<(), CliError> {
        tracing::info!(program = %self.program, "Launching game client");
        let child = std::process::Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .map_err(|e| {
                CliError::Connection(format!("Failed to launch {}: {e}", self.program))
            })?;
        tracing::debug!(pid = child.id(), "Game client started");
        Ok(())
    }
}

impl std::fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Substitutes `{address}`, `{port}` and `{endpoint}` in a launch argument
fn expand_placeholders(arg: &str, endpoint: SocketAddr) -> String {
    arg.replace("{address}", &endpoint.ip().to_string())
        .replace("{port}", &endpoint.port().to_string())
        .replace("{endpoint}", &endpoint.to_string())
}
