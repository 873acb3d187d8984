//! chat-server
//!
//! Multi-client async TCP server for the group chat.

pub mod config;
pub mod registry;
pub mod server;
pub mod types;

// these are internal modules, not re-exported
mod dispatch;
mod session;
