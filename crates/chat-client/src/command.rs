//! Parsing of the lines a user types.
//!
//! Recognised forms:
//!
//! ```text
//! close connection
//! list users
//! send to <id> "<text>"
//! send all "<text>"
//! ```
//!
//! The `<id>` of `send to` is kept as typed; validating it is the sender
//! actor's job so it can answer locally.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Close,
    ListUsers,
    SendTo { target: String, text: String },
    SendAll { text: String },
}

impl Command {
    /// Parse one input line. Unknown or incomplete commands yield `None`.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim_end_matches(['\r', '\n']);

        match line {
            "close connection" => return Some(Command::Close),
            "list users" => return Some(Command::ListUsers),
            _ => {}
        }

        if let Some(rest) = line.strip_prefix("send to ") {
            let rest = rest.trim_start();
            let (target, tail) = rest.split_once(char::is_whitespace)?;
            let text = quoted(tail.trim_start())?;
            return Some(Command::SendTo {
                target: target.to_string(),
                text,
            });
        }

        if let Some(rest) = line.strip_prefix("send all ") {
            let text = quoted(rest.trim_start())?;
            return Some(Command::SendAll { text });
        }

        None
    }
}

/// Text between a leading `"` and the next `"`; `None` if empty or
/// unterminated.
fn quoted(s: &str) -> Option<String> {
    let inner = s.strip_prefix('"')?;
    let (text, _) = inner.split_once('"')?;
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}
