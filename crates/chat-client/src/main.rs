// crates/chat-client/src/main.rs

use std::io::{self, BufRead};
use std::net::IpAddr;
use std::process::ExitCode;
use std::thread;

use anyhow::{Context, Result};
use chat_client::{session, ClientError, SessionEnd};
use clap::Parser;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "chat-client")]
#[clap(about = "Terminal client for the group chat server")]
#[clap(after_help = "Examples:\n  chat-client 127.0.0.1 51511\n  chat-client ::1 51511")]
struct Cli {
    /// Server IPv4 or IPv6 address
    server: IpAddr,

    /// Server port
    #[clap(value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Enable debug logging (to stderr)
    #[clap(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code)
    });

    if cli.debug {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .with_writer(io::stderr)
            .init();
    }

    let stream = TcpStream::connect((cli.server, cli.port))
        .await
        .with_context(|| format!("cannot connect to {}:{}", cli.server, cli.port))?;
    stream.set_nodelay(true)?;
    info!("connected to {}:{}", cli.server, cli.port);

    let lines = spawn_stdin_reader();
    let (console_tx, mut console_rx) = mpsc::unbounded_channel::<String>();

    let printer = tokio::spawn(async move {
        while let Some(line) = console_rx.recv().await {
            println!("{}", line);
        }
    });

    let outcome = session::run(stream, lines, console_tx).await;
    let _ = printer.await;

    match outcome {
        Ok(SessionEnd::Removed) => Ok(ExitCode::SUCCESS),
        Ok(SessionEnd::Disconnected) => {
            eprintln!("connection to server lost");
            Ok(ExitCode::FAILURE)
        }
        Err(ClientError::Rejected(_)) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e).context("chat session failed"),
    }
}

/// Read stdin on a plain thread, one line per message. The channel closes
/// at end of input.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
