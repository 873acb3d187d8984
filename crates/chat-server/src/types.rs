//! Shared types for the chat TCP server.
//!
//! This module defines:
//! - channel aliases between dispatch and each connection's writer task
//! - the shared registry handle passed to every connection task

use std::sync::Arc;

use chat_core::Message;
use tokio::sync::mpsc;

use crate::registry::SessionRegistry;

/// Outbound messages queued for one connection.
///
/// The sending half is the connection handle a registry slot holds; the
/// receiving half is drained by that connection's writer task, which owns
/// the socket's write half.
pub type OutboundTx = mpsc::UnboundedSender<Message>;
pub type OutboundRx = mpsc::UnboundedReceiver<Message>;

/// Registry shared by every connection task.
pub type SharedRegistry = Arc<SessionRegistry>;
