//! Name resolution for server hostnames
//!
//! [`ResolverAdapter`] runs a [`Resolver`] on the Tokio runtime and hands back
//! a [`PendingLookup`], a single-result future that can be aborted. Literal
//! addresses are recognized with [`parse_literal_address`] so callers can skip
//! resolution entirely, and [`pick_preferred_address`] applies the IPv4-first
//! preference to a lookup result.

use std::future::Future;
use std::net::{IpAddr, Ipv6Addr};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug};

use crate::tracing::span_names;

/// Errors produced while resolving a hostname
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The platform resolver reported an error
    #[error("Failed to resolve '{host}': {reason}")]
    LookupFailed {
        /// The hostname being resolved
        host: String,
        /// The reason for the failure
        reason: String,
    },

    /// The lookup succeeded but returned no addresses
    #[error("No addresses found for '{0}'")]
    NoAddresses(String),

    /// There was no Tokio runtime to run the lookup on
    #[error("Cannot resolve '{0}': no async runtime available")]
    NoRuntime(String),

    /// The lookup was aborted before it finished
    #[error("Resolution of '{0}' was cancelled")]
    Cancelled(String),
}

/// Result type alias for resolution
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Asynchronous hostname resolver
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolves `hostname` to its addresses in the order the resolver returns
    /// them
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::LookupFailed`] if the lookup fails.
    async fn resolve(&self, hostname: &str) -> ResolveResult<Vec<IpAddr>>;
}

/// Resolver backed by the operating system via [`tokio::net::lookup_host`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl Resolver for SystemResolver {
    async fn resolve(&self, hostname: &str) -> ResolveResult<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((hostname, 0))
            .await
            .map_err(|e| ResolveError::LookupFailed {
                host: hostname.to_string(),
                reason: e.to_string(),
            })?;

        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }
        Ok(ips)
    }
}

/// Parses `host` as a literal IPv4 or IPv6 address
///
/// Surrounding whitespace is ignored and IPv6 literals may be bracketed
/// (`[::1]`).
#[must_use]
pub fn parse_literal_address(host: &str) -> Option<IpAddr> {
    let host = host.trim();
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Some(ip);
    }
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .and_then(|h| h.parse::<Ipv6Addr>().ok())
        .map(IpAddr::V6)
}

/// Picks the address to connect to: the first IPv4 address, or failing that
/// the first address of any family
#[must_use]
pub fn pick_preferred_address(addresses: &[IpAddr]) -> Option<IpAddr> {
    addresses
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addresses.first())
        .copied()
}

/// An in-flight lookup started by [`ResolverAdapter::resolve`]
///
/// Resolves to the address list, or to an error if the lookup failed, came
/// back empty, panicked or was aborted.
#[derive(Debug)]
pub struct PendingLookup {
    hostname: String,
    task: JoinHandle<ResolveResult<Vec<IpAddr>>>,
}

impl PendingLookup {
    /// Hostname being resolved
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Aborts the lookup; awaiting it afterwards yields [`ResolveError::Cancelled`]
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Returns true once the result is available
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Future for PendingLookup {
    type Output = ResolveResult<Vec<IpAddr>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.task).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) if e.is_cancelled() => {
                Poll::Ready(Err(ResolveError::Cancelled(this.hostname.clone())))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Err(ResolveError::LookupFailed {
                host: this.hostname.clone(),
                reason: e.to_string(),
            })),
        }
    }
}

/// Runs lookups for the connection orchestrator
#[derive(Clone)]
pub struct ResolverAdapter {
    resolver: Arc<dyn Resolver>,
    runtime: Option<Handle>,
}

impl std::fmt::Debug for ResolverAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverAdapter")
            .field("runtime", &self.runtime.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for ResolverAdapter {
    fn default() -> Self {
        Self::system()
    }
}

impl ResolverAdapter {
    /// Creates an adapter around `resolver` that spawns on the ambient runtime
    #[must_use]
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            runtime: None,
        }
    }

    /// Creates an adapter around the [`SystemResolver`]
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemResolver))
    }

    /// Spawns lookups on `runtime` instead of the ambient runtime
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Starts resolving `hostname` in the background
    ///
    /// An empty address list is turned into [`ResolveError::NoAddresses`]
    /// before it reaches the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoRuntime`] if no runtime was configured and the
    /// caller is not running inside one.
    pub fn resolve(&self, hostname: &str) -> ResolveResult<PendingLookup> {
        let runtime = match &self.runtime {
            Some(handle) => handle.clone(),
            None => Handle::try_current()
                .map_err(|_| ResolveError::NoRuntime(hostname.to_string()))?,
        };

        let resolver = Arc::clone(&self.resolver);
        let host = hostname.to_string();
        let span = tracing::debug_span!(span_names::RESOLVER_LOOKUP, host = %host);

        debug!(host = %host, "Starting hostname resolution");
        let task = runtime.spawn(
            async move {
                let addresses = resolver.resolve(&host).await?;
                if addresses.is_empty() {
                    return Err(ResolveError::NoAddresses(host));
                }
                debug!(count = addresses.len(), "Hostname resolved");
                Ok(addresses)
            }
            .instrument(span),
        );

        Ok(PendingLookup {
            hostname: hostname.to_string(),
            task,
        })
    }
}
