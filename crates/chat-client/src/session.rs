//! Client session wiring.
//!
//! Registers, then runs the two actors over the split socket until the
//! receiver ends, which is what decides how the session ended.

use std::sync::Arc;

use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

use crate::console::{self, ConsoleTx};
use crate::error::ClientError;
use crate::network;
use crate::receiver::run_receiver;
use crate::sender::run_sender;
use crate::shared::ClientShared;

/// How a registered session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server confirmed our deregistration.
    Removed,

    /// The connection dropped without a confirmation.
    Disconnected,
}

/// Run a whole client session over `stream`.
///
/// `lines` feeds the sender actor with typed input; `console` receives
/// every line meant for the user. A rejected registration has its reason
/// shown on the console and comes back as [`ClientError::Rejected`].
pub async fn run(
    mut stream: TcpStream,
    lines: UnboundedReceiver<String>,
    console: ConsoleTx,
) -> Result<SessionEnd, ClientError> {
    let registration = match network::register(&mut stream).await {
        Ok(registration) => registration,
        Err(ClientError::Rejected(reason)) => {
            console::show(&console, reason.clone());
            return Err(ClientError::Rejected(reason));
        }
        Err(e) => return Err(e),
    };
    console::show(&console, registration.welcome);

    let shared = Arc::new(ClientShared::new(registration.id, registration.roster));
    let (read_half, write_half) = stream.into_split();

    let receiver = {
        let shared = shared.clone();
        let console = console.clone();
        tokio::spawn(async move { run_receiver(read_half, &shared, &console).await })
    };

    let sender = tokio::spawn(async move { run_sender(write_half, lines, &shared, &console).await });

    let end = receiver.await?;

    // The sender may still be waiting for input; it has nothing left to do.
    sender.abort();
    match sender.await {
        Ok(Err(e)) => warn!("sender stopped with an error: {}", e),
        Ok(Ok(())) | Err(_) => {}
    }

    end
}
