//! Lines shown to the user.
//!
//! Both actors push finished lines onto one channel; the binary prints
//! them, tests read them back.

use chat_core::{UserId, NULL_ID};
use chrono::Local;
use tokio::sync::mpsc;

pub type ConsoleTx = mpsc::UnboundedSender<String>;
pub type ConsoleRx = mpsc::UnboundedReceiver<String>;

/// Print `line`. A closed console only means nobody is watching anymore.
pub fn show(console: &ConsoleTx, line: impl Into<String>) {
    let _ = console.send(line.into());
}

/// Current local time as `[HH:MM]`.
pub fn timestamp() -> String {
    Local::now().format("[%H:%M]").to_string()
}

/// Chat line for a sender we have heard from before.
///
/// `P ` marks a direct message; the sender id is left out for our own
/// broadcast echo.
pub fn chat_line(stamp: &str, my_id: UserId, sender_id: UserId, receiver_id: UserId, body: &str) -> String {
    let mut line = String::new();
    if receiver_id != NULL_ID {
        line.push_str("P ");
    }
    line.push_str(stamp);
    if sender_id != my_id {
        line.push_str(&format!(" {}:", sender_id));
    }
    line.push(' ');
    line.push_str(body);
    line
}

/// Confirmation line for a delivered direct message.
pub fn delivered_line(stamp: &str, receiver_id: UserId, text: &str) -> String {
    format!("P {} -> {}: {}", stamp, receiver_id, text)
}
