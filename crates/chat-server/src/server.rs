//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address family/port.
//! - Accepts new TCP connections.
//! - Spawns a per-connection task (see `session`) sharing one registry.
//!
//! Ids are not handed out on accept: a connection only gets a slot once it
//! sends a `RegisterRequest`, so the registry (not the listener) enforces
//! the user limit.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::registry::SessionRegistry;
use crate::session;
use crate::types::SharedRegistry;

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Run the TCP server with the given configuration.
///
/// Only binding can fail; once listening the server runs until the
/// process is stopped.
pub async fn run(config: Config) -> io::Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);

    let registry: SharedRegistry = Arc::new(SessionRegistry::new(config.max_clients));
    serve(listener, registry, config.idle_timeout).await;
    Ok(())
}

/// Accept connections on an already-bound listener, forever.
///
/// A failed `accept` never stops the server. Errors tied to one incoming
/// connection are skipped; anything else (typically running out of file
/// descriptors) is retried after a short pause.
pub async fn serve(listener: TcpListener, registry: SharedRegistry, idle_timeout: Option<Duration>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) if is_connection_error(&e) => {
                debug!("accept: {}", e);
                continue;
            }
            Err(e) => {
                warn!("accept failed, retrying in {:?}: {}", ACCEPT_RETRY_DELAY, e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        info!(%peer, "accepted connection");

        let registry = registry.clone();
        tokio::spawn(async move {
            session::run_session(stream, peer, registry, idle_timeout).await;
        });
    }
}

/// Errors that only concern the connection being accepted.
fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionAborted | io::ErrorKind::ConnectionReset
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_connection_failures_are_skipped() {
        assert!(is_connection_error(&io::Error::from(io::ErrorKind::ConnectionAborted)));
        assert!(is_connection_error(&io::Error::from(io::ErrorKind::ConnectionReset)));
    }

    #[test]
    fn resource_exhaustion_is_retried_later() {
        // EMFILE surfaces as an uncategorized OS error.
        assert!(!is_connection_error(&io::Error::from_raw_os_error(24)));
        assert!(!is_connection_error(&io::Error::from(io::ErrorKind::OutOfMemory)));
    }
}
